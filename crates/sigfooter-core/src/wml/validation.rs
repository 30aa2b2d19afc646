//! Post-relocation checks.
//!
//! These never fail a run. Each finding is a warning naming the part it was
//! found in; only an archive or part that cannot be read is an error.

use super::document::WmlDocument;
use super::settings::RelocationSettings;
use crate::error::{Result, SigFooterError};
use crate::package::content_types::{content_type_values, ContentTypes, CONTENT_TYPES_PART};
use crate::package::relationships::{
    find_by_target, find_relationship, parse_relationships, relationship_types,
};
use crate::xml::namespaces::{R, W};
use roxmltree::{Document, Node};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    pub part: String,
    pub message: String,
}

impl ValidationWarning {
    fn new(part: &str, message: impl Into<String>) -> Self {
        Self {
            part: part.to_string(),
            message: message.into(),
        }
    }
}

/// Check a saved package for the state a successful relocation leaves behind.
pub fn validate_package(bytes: &[u8], settings: &RelocationSettings) -> Result<Vec<ValidationWarning>> {
    let document = WmlDocument::from_bytes(bytes)?;
    let package = document.package();
    let main_part = document.main_part_name();
    let footer_part = document.sibling_part(&settings.footer_part_name);
    let mut warnings = Vec::new();

    match package.get_part(&footer_part) {
        None => warnings.push(ValidationWarning::new(&footer_part, "footer part is missing")),
        Some(footer_bytes) => check_footer(&footer_part, footer_bytes, settings, &mut warnings)?,
    }

    let main_xml = part_text(main_part, package.get_part(main_part))?;
    let main = parse_part(main_part, &main_xml)?;
    check_sections(main_part, &main, settings, &mut warnings);

    let manifest = ContentTypes::from_xml(&package.get_xml_part(CONTENT_TYPES_PART)?)?;
    if !manifest.has_override(&footer_part) {
        warnings.push(ValidationWarning::new(
            CONTENT_TYPES_PART,
            format!("no content type override for {}", footer_part),
        ));
    } else if let Some(other) = manifest
        .get_content_type(&footer_part)
        .filter(|&ct| ct != content_type_values::WORD_FOOTER)
    {
        warnings.push(ValidationWarning::new(
            CONTENT_TYPES_PART,
            format!("{} is registered as '{}'", footer_part, other),
        ));
    }

    let rels_part = document.main_relationships_part();
    let rels = parse_relationships(&package.get_xml_part(&rels_part)?)
        .map_err(|e| e.in_part(&rels_part))?;
    let footer_rel = find_relationship(&rels, main_part, &footer_part, relationship_types::FOOTER);
    match footer_rel.or_else(|| find_by_target(&rels, main_part, &footer_part)) {
        Some(rel) if rel.rel_type == relationship_types::FOOTER => {
            let referenced = main
                .descendants()
                .filter(|n| n.has_tag_name((W::NS, "footerReference")))
                .any(|n| n.attribute((R::NS, "id")) == Some(rel.id.as_str()));
            if !referenced {
                warnings.push(ValidationWarning::new(
                    main_part,
                    format!("no footer reference uses relationship {}", rel.id),
                ));
            }
        }
        Some(rel) => warnings.push(ValidationWarning::new(
            &rels_part,
            format!("relationship {} targets {} with type {}", rel.id, footer_part, rel.rel_type),
        )),
        None => warnings.push(ValidationWarning::new(
            &rels_part,
            format!("no relationship targets {}", footer_part),
        )),
    }

    for warning in &warnings {
        log::warn!("{}: {}", warning.part, warning.message);
    }
    Ok(warnings)
}

fn part_text(part: &str, bytes: Option<&[u8]>) -> Result<String> {
    let bytes = bytes.ok_or_else(|| SigFooterError::missing_part(part))?;
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8(bytes.to_vec()).map_err(|e| SigFooterError::MalformedDocument {
        part: part.to_string(),
        message: e.to_string(),
        location: format!("byte {}", e.utf8_error().valid_up_to()),
    })
}

fn parse_part<'a>(part: &str, xml: &'a str) -> Result<Document<'a>> {
    Document::parse(xml).map_err(|e| SigFooterError::MalformedDocument {
        part: part.to_string(),
        message: e.to_string(),
        location: e.pos().to_string(),
    })
}

fn check_footer(
    part: &str,
    bytes: &[u8],
    settings: &RelocationSettings,
    warnings: &mut Vec<ValidationWarning>,
) -> Result<()> {
    let xml = part_text(part, Some(bytes))?;
    let footer = parse_part(part, &xml)?;
    let root = footer.root_element();

    if !root.has_tag_name((W::NS, "ftr")) {
        warnings.push(ValidationWarning::new(part, "root element is not w:ftr"));
    }
    if !root.children().any(|c| c.has_tag_name((W::NS, "tbl"))) {
        warnings.push(ValidationWarning::new(part, "footer holds no table"));
    }
    let drawings = root
        .descendants()
        .filter(|n| n.has_tag_name((W::NS, "drawing")))
        .count();
    if drawings > 0 {
        warnings.push(ValidationWarning::new(
            part,
            format!("footer still holds {} drawing(s)", drawings),
        ));
    }
    if has_fill(&root, &settings.shading_fill) {
        warnings.push(ValidationWarning::new(
            part,
            format!("footer still carries shading fill {}", settings.shading_fill),
        ));
    }
    Ok(())
}

fn has_fill(root: &Node, fill: &str) -> bool {
    root.descendants()
        .filter(|n| n.has_tag_name((W::NS, "shd")))
        .filter_map(|n| n.attribute((W::NS, "fill")))
        .any(|value| value.eq_ignore_ascii_case(fill))
}

fn check_sections(
    part: &str,
    main: &Document,
    settings: &RelocationSettings,
    warnings: &mut Vec<ValidationWarning>,
) {
    let sections: Vec<Node> = main
        .descendants()
        .filter(|n| n.has_tag_name((W::NS, "sectPr")))
        .filter(|n| !n.ancestors().any(|a| a.has_tag_name((W::NS, "sectPrChange"))))
        .collect();
    if sections.is_empty() {
        warnings.push(ValidationWarning::new(part, "document has no section properties"));
        return;
    }

    let expected = settings.margins.attributes();
    for (index, sect) in sections.iter().enumerate() {
        let has_footer = sect
            .children()
            .any(|c| c.has_tag_name((W::NS, "footerReference")));
        if !has_footer {
            warnings.push(ValidationWarning::new(
                part,
                format!("section {} has no footer reference", index + 1),
            ));
        }

        let Some(pg_mar) = sect.children().find(|c| c.has_tag_name((W::NS, "pgMar"))) else {
            warnings.push(ValidationWarning::new(
                part,
                format!("section {} has no page margins", index + 1),
            ));
            continue;
        };
        let mismatched: Vec<&str> = expected
            .iter()
            .filter(|(name, value)| pg_mar.attribute((W::NS, *name)) != Some(value.as_str()))
            .map(|(name, _)| *name)
            .collect();
        if !mismatched.is_empty() {
            warnings.push(ValidationWarning::new(
                part,
                format!("section {} margins differ: {}", index + 1, mismatched.join(", ")),
            ));
        }
    }
}
