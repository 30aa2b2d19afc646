use super::settings::PageMargins;
use crate::error::{Result, SigFooterError};
use crate::xml::arena::XmlDocument;
use crate::xml::namespaces::{R, W};
use crate::xml::{XAttribute, XName, XmlNodeData};
use indextree::NodeId;
use serde::Serialize;

/// Children of `w:sectPr` that precede `w:pgMar` in schema order.
const BEFORE_PG_MAR: &[&str] = &[
    "headerReference",
    "footerReference",
    "footnotePr",
    "endnotePr",
    "type",
    "pgSz",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionStats {
    pub sections: usize,
    pub references_added: usize,
    pub references_retargeted: usize,
    pub margins_inserted: usize,
}

/// Point every section at the footer relationship `rel_id` and apply `margins`.
///
/// A section without a default `w:footerReference` gets one after its header
/// references (or as its first child). An existing default reference is
/// retargeted to `rel_id`. `w:pgMar` is rewritten on every run.
pub fn apply_section_properties(
    doc: &mut XmlDocument,
    rel_id: &str,
    margins: &PageMargins,
    part: &str,
) -> Result<SectionStats> {
    let root = doc
        .root()
        .ok_or_else(|| SigFooterError::element_not_found("w:document", part))?;

    let sections: Vec<NodeId> = doc
        .find_elements(root, W::NS, "sectPr")
        .filter(|&sect| !is_revision_record(doc, sect))
        .collect();
    if sections.is_empty() {
        return Err(SigFooterError::element_not_found("w:sectPr", part));
    }

    declare_relationships_namespace(doc, root);

    let mut stats = SectionStats {
        sections: sections.len(),
        ..SectionStats::default()
    };
    for sect in sections {
        match ensure_default_footer_reference(doc, sect, rel_id) {
            ReferenceChange::Added => stats.references_added += 1,
            ReferenceChange::Retargeted => stats.references_retargeted += 1,
            ReferenceChange::Unchanged => {}
        }
        if rewrite_page_margins(doc, sect, margins) {
            stats.margins_inserted += 1;
        }
    }

    log::debug!("updated {} section(s): {:?}", stats.sections, stats);
    Ok(stats)
}

/// `w:sectPrChange` keeps the previous section properties of a tracked change.
fn is_revision_record(doc: &XmlDocument, sect: NodeId) -> bool {
    doc.ancestors(sect)
        .skip(1)
        .any(|a| doc.is_named(a, W::NS, "sectPrChange"))
}

fn declare_relationships_namespace(doc: &mut XmlDocument, root: NodeId) {
    let declared = doc
        .get(root)
        .and_then(|d| d.attributes())
        .is_some_and(|attrs| {
            attrs
                .iter()
                .any(|a| a.is_namespace_declaration() && a.value == R::NS)
        });
    if !declared {
        doc.set_attribute(root, &XName::xmlns("r"), R::NS);
    }
}

enum ReferenceChange {
    Added,
    Retargeted,
    Unchanged,
}

fn is_default_reference(doc: &XmlDocument, reference: NodeId) -> bool {
    // w:type is required by the schema; Word reads a missing one as "default".
    doc.attribute(reference, &W::type_())
        .map_or(true, |kind| kind == "default")
}

fn ensure_default_footer_reference(
    doc: &mut XmlDocument,
    sect: NodeId,
    rel_id: &str,
) -> ReferenceChange {
    let footer_reference = W::footerReference();
    let defaults: Vec<NodeId> = doc
        .elements_by_name(sect, &footer_reference)
        .filter(|&reference| is_default_reference(doc, reference))
        .collect();

    let Some((&first, duplicates)) = defaults.split_first() else {
        let data = XmlNodeData::element_with_attrs(
            W::footerReference(),
            vec![
                XAttribute::new(W::type_(), "default"),
                XAttribute::new(R::id(), rel_id),
            ],
        );
        let header_reference = W::headerReference();
        let last_header = doc.elements_by_name(sect, &header_reference).last();
        match last_header {
            Some(header) => doc.add_after(header, data),
            None => doc.prepend_child(sect, data),
        };
        return ReferenceChange::Added;
    };

    for &duplicate in duplicates {
        doc.remove_subtree(duplicate);
    }

    if doc.attribute(first, &R::id()) == Some(rel_id) && duplicates.is_empty() {
        ReferenceChange::Unchanged
    } else {
        doc.set_attribute(first, &W::type_(), "default");
        doc.set_attribute(first, &R::id(), rel_id);
        ReferenceChange::Retargeted
    }
}

/// Returns true when a `w:pgMar` had to be created.
fn rewrite_page_margins(doc: &mut XmlDocument, sect: NodeId, margins: &PageMargins) -> bool {
    let attributes: Vec<XAttribute> = margins
        .attributes()
        .iter()
        .map(|(name, value)| XAttribute::new(XName::new(W::NS, name), value))
        .collect();

    let pg_mar = W::pgMar();
    let existing = doc.elements_by_name(sect, &pg_mar).next();
    if let Some(node) = existing {
        if let Some(attrs) = doc.get_mut(node).and_then(|d| d.attributes_mut()) {
            *attrs = attributes;
        }
        return false;
    }

    let data = XmlNodeData::element_with_attrs(W::pgMar(), attributes);
    let anchor = doc
        .child_elements(sect)
        .filter(|&child| {
            BEFORE_PG_MAR
                .iter()
                .any(|name| doc.is_named(child, W::NS, name))
        })
        .last();
    match anchor {
        Some(anchor) => doc.add_after(anchor, data),
        None => doc.prepend_child(sect, data),
    };
    true
}
