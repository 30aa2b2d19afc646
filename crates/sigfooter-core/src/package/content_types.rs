use crate::error::{Result, SigFooterError};
use crate::xml::namespaces::CT;
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData};

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Parsed view of `[Content_Types].xml`.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    pub fn from_xml(doc: &XmlDocument) -> Result<Self> {
        let root = types_root(doc)?;
        let mut content_types = Self::default();

        for child in doc.child_elements(root) {
            let Some(data) = doc.get(child) else { continue };
            let content_type = data
                .attribute(&XName::local("ContentType"))
                .unwrap_or_default()
                .to_string();
            if data.is_named(CT::NS, "Default") {
                if let Some(ext) = data.attribute(&XName::local("Extension")) {
                    content_types.defaults.push((ext.to_string(), content_type));
                }
            } else if data.is_named(CT::NS, "Override") {
                if let Some(part) = data.attribute(&XName::local("PartName")) {
                    content_types.overrides.push((part.to_string(), content_type));
                }
            }
        }

        Ok(content_types)
    }

    /// Content type for a package path such as `word/footer1.xml`.
    pub fn get_content_type(&self, path: &str) -> Option<&str> {
        let part_name = part_name(path);
        if let Some((_, ct)) = self
            .overrides
            .iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(&part_name))
        {
            return Some(ct);
        }

        let ext = path.rsplit_once('.').map(|(_, ext)| ext)?;
        self.defaults
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(ext))
            .map(|(_, ct)| ct.as_str())
    }

    pub fn has_override(&self, path: &str) -> bool {
        let part_name = part_name(path);
        self.overrides
            .iter()
            .any(|(p, _)| p.eq_ignore_ascii_case(&part_name))
    }

    pub fn has_default(&self, extension: &str) -> bool {
        self.defaults
            .iter()
            .any(|(e, _)| e.eq_ignore_ascii_case(extension))
    }
}

/// OPC part name (leading slash) for a package path.
pub fn part_name(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

fn types_root(doc: &XmlDocument) -> Result<indextree::NodeId> {
    doc.root()
        .filter(|&root| doc.is_named(root, CT::NS, "Types"))
        .ok_or_else(|| SigFooterError::element_not_found("Types", CONTENT_TYPES_PART))
}

/// Append an `Override` for `path`. Returns `false` without touching the
/// document when one already exists.
pub fn add_override(doc: &mut XmlDocument, path: &str, content_type: &str) -> Result<bool> {
    if ContentTypes::from_xml(doc)?.has_override(path) {
        return Ok(false);
    }
    let root = types_root(doc)?;
    doc.add_child(
        root,
        XmlNodeData::element_with_attrs(
            CT::Override(),
            vec![
                XAttribute::new(XName::local("PartName"), &part_name(path)),
                XAttribute::new(XName::local("ContentType"), content_type),
            ],
        ),
    );
    Ok(true)
}

/// Add a `Default` for `extension` ahead of the overrides, unless one exists.
pub fn add_default(doc: &mut XmlDocument, extension: &str, content_type: &str) -> Result<bool> {
    if ContentTypes::from_xml(doc)?.has_default(extension) {
        return Ok(false);
    }
    let root = types_root(doc)?;
    let data = XmlNodeData::element_with_attrs(
        CT::Default(),
        vec![
            XAttribute::new(XName::local("Extension"), extension),
            XAttribute::new(XName::local("ContentType"), content_type),
        ],
    );
    let first = doc.child_elements(root).next();
    match first {
        Some(first) => doc.add_before(first, data),
        None => doc.add_child(root, data),
    };
    Ok(true)
}

pub mod content_type_values {
    pub const WORD_DOCUMENT: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    pub const WORD_FOOTER: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
}
