use crate::error::{Result, SigFooterError};
use crate::xml::namespaces::PR;
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData};
use serde::{Deserialize, Serialize};

const ID_PREFIX: &str = "rId";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TargetMode {
    #[default]
    Internal,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    #[serde(default)]
    pub target_mode: TargetMode,
}

impl Relationship {
    pub fn new(id: &str, rel_type: &str, target: &str) -> Self {
        Self {
            id: id.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: TargetMode::Internal,
        }
    }

    fn to_node(&self) -> XmlNodeData {
        let mut attrs = vec![
            XAttribute::new(XName::local("Id"), &self.id),
            XAttribute::new(XName::local("Type"), &self.rel_type),
            XAttribute::new(XName::local("Target"), &self.target),
        ];
        if self.target_mode == TargetMode::External {
            attrs.push(XAttribute::new(XName::local("TargetMode"), "External"));
        }
        XmlNodeData::element_with_attrs(PR::Relationship(), attrs)
    }
}

/// `word/document.xml` -> `word/_rels/document.xml.rels`
pub fn relationships_part_for(part_path: &str) -> String {
    match part_path.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_path),
    }
}

/// Resolve a relationship target against the part that owns the relationship.
/// `("word/document.xml", "media/image1.png")` -> `word/media/image1.png`.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn relationships_root(doc: &XmlDocument, part: &str) -> Result<indextree::NodeId> {
    doc.root()
        .filter(|&root| doc.is_named(root, PR::NS, "Relationships"))
        .ok_or_else(|| SigFooterError::element_not_found("Relationships", part))
}

pub fn parse_relationships(doc: &XmlDocument) -> Result<Vec<Relationship>> {
    let root = relationships_root(doc, "relationships part")?;
    let attr = |data: &XmlNodeData, name: &str| {
        data.attribute(&XName::local(name))
            .unwrap_or_default()
            .to_string()
    };

    Ok(doc
        .elements_by_name(root, &PR::Relationship())
        .filter_map(|id| doc.get(id))
        .map(|data| Relationship {
            id: attr(data, "Id"),
            rel_type: attr(data, "Type"),
            target: attr(data, "Target"),
            target_mode: match data.attribute(&XName::local("TargetMode")) {
                Some("External") => TargetMode::External,
                _ => TargetMode::Internal,
            },
        })
        .collect())
}

/// `rId` followed by one more than the largest numeric `rId` suffix in use,
/// or `rId1` for a table without any.
pub fn next_relationship_id(rels: &[Relationship]) -> String {
    let max = rels
        .iter()
        .filter_map(|rel| rel.id.strip_prefix(ID_PREFIX))
        .filter(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max();

    let mut next = max.map_or(1, |n| n + 1);
    // Ids such as "rId2a" never parse, but keep the result unique anyway.
    while rels.iter().any(|rel| rel.id == format!("{}{}", ID_PREFIX, next)) {
        next += 1;
    }
    format!("{}{}", ID_PREFIX, next)
}

/// Internal relationship from `source_part` whose target resolves to `target_part`.
pub fn find_by_target<'a>(
    rels: &'a [Relationship],
    source_part: &str,
    target_part: &str,
) -> Option<&'a Relationship> {
    rels.iter().find(|rel| {
        rel.target_mode == TargetMode::Internal
            && resolve_target(source_part, &rel.target).eq_ignore_ascii_case(target_part)
    })
}

/// Internal relationship of type `rel_type` from `source_part` that resolves
/// to `target_part`.
pub fn find_relationship<'a>(
    rels: &'a [Relationship],
    source_part: &str,
    target_part: &str,
    rel_type: &str,
) -> Option<&'a Relationship> {
    rels.iter().find(|rel| {
        rel.rel_type == rel_type
            && rel.target_mode == TargetMode::Internal
            && resolve_target(source_part, &rel.target).eq_ignore_ascii_case(target_part)
    })
}

/// Append `rel` to the relationships of `source_part`.
///
/// Returns `false` when `rel` is already present: same id, same type, and a
/// target resolving to the same part. A relationship of that type and target
/// under another id, or another relationship holding `rel.id`, is a conflict.
pub fn add_relationship(doc: &mut XmlDocument, source_part: &str, rel: &Relationship) -> Result<bool> {
    let existing = parse_relationships(doc)?;
    let matches = |r: &Relationship| {
        r.rel_type == rel.rel_type
            && r.target_mode == rel.target_mode
            && match rel.target_mode {
                TargetMode::Internal => resolve_target(source_part, &r.target)
                    .eq_ignore_ascii_case(&resolve_target(source_part, &rel.target)),
                TargetMode::External => r.target == rel.target,
            }
    };

    if let Some(found) = existing.iter().find(|r| matches(r)) {
        if found.id == rel.id {
            return Ok(false);
        }
        return Err(SigFooterError::relationship_conflict(&found.id, ""));
    }
    if existing.iter().any(|r| r.id == rel.id) {
        return Err(SigFooterError::relationship_conflict(&rel.id, ""));
    }

    let root = relationships_root(doc, "relationships part")?;
    doc.add_child(root, rel.to_node());
    Ok(true)
}

/// A fresh relationships part holding `rels`.
pub fn relationships_document(rels: &[Relationship]) -> XmlDocument {
    let mut doc = XmlDocument::new();
    let root = doc.add_root(XmlNodeData::element_with_attrs(
        PR::Relationships(),
        vec![XAttribute::new(XName::local("xmlns"), PR::NS)],
    ));
    for rel in rels {
        doc.add_child(root, rel.to_node());
    }
    doc
}

pub mod relationship_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const FOOTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const HYPERLINK: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
}
