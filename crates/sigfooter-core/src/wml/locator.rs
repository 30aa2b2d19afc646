//! Finding the tables the relocation works on.
//!
//! Only top-level tables count: a table nested inside another table's cell is
//! part of its outer table and moves with it.

use super::settings::{FooterSource, RelocationSettings};
use crate::error::{Result, SigFooterError};
use crate::xml::arena::XmlDocument;
use crate::xml::namespaces::{R, W};
use indextree::NodeId;
use memchr::memmem;

/// Top-level tables under `body`, in document order.
pub fn find_tables(doc: &XmlDocument, body: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    doc.find_elements(body, W::NS, "tbl")
        .filter(move |&tbl| !has_table_ancestor(doc, tbl, body))
}

fn has_table_ancestor(doc: &XmlDocument, node: NodeId, stop: NodeId) -> bool {
    doc.ancestors(node)
        .skip(1)
        .take_while(|&ancestor| ancestor != stop)
        .any(|ancestor| doc.is_named(ancestor, W::NS, "tbl"))
}

/// A table qualifies when its text contains the marker and some
/// relationship-namespace attribute inside it (`r:embed`, `r:id`, ...)
/// names one of the configured resource ids.
pub fn is_signature_table(doc: &XmlDocument, tbl: NodeId, settings: &RelocationSettings) -> bool {
    has_marker(doc, tbl, &settings.marker)
        && references_any_resource(doc, tbl, &settings.resource_ids)
}

/// True when the text under `node` contains `marker`, even split across runs.
pub fn has_marker(doc: &XmlDocument, node: NodeId, marker: &str) -> bool {
    let text = doc.text_content(node);
    memmem::find(text.as_bytes(), marker.as_bytes()).is_some()
}

fn references_any_resource(doc: &XmlDocument, node: NodeId, ids: &[String]) -> bool {
    doc.descendants(node)
        .filter_map(|id| doc.get(id).and_then(|data| data.attributes()))
        .flatten()
        .filter(|attr| attr.name.namespace.as_deref() == Some(R::NS))
        .any(|attr| ids.iter().any(|rid| rid == &attr.value))
}

/// Qualifying signature tables under `body`, in document order.
pub fn find_signature_tables<'a>(
    doc: &'a XmlDocument,
    body: NodeId,
    settings: &'a RelocationSettings,
) -> impl Iterator<Item = NodeId> + 'a {
    find_tables(doc, body).filter(move |&tbl| is_signature_table(doc, tbl, settings))
}

/// Top-level tables whose text carries the marker, whatever images they
/// reference. These are the tables that get their decoration stripped.
pub fn find_marked_tables<'a>(
    doc: &'a XmlDocument,
    body: NodeId,
    marker: &'a str,
) -> impl Iterator<Item = NodeId> + 'a {
    find_tables(doc, body).filter(move |&tbl| has_marker(doc, tbl, marker))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterSourceSelection {
    pub table: NodeId,
    /// Whether the selected table is itself a signature table.
    pub is_signature_table: bool,
}

/// Pick the table that becomes the footer: always the last top-level table.
pub fn select_footer_source(
    doc: &XmlDocument,
    body: NodeId,
    settings: &RelocationSettings,
) -> Result<FooterSourceSelection> {
    let table = find_tables(doc, body)
        .last()
        .ok_or(SigFooterError::NoTableToExtract)?;
    let qualifies = is_signature_table(doc, table, settings);

    if !qualifies {
        match settings.footer_source {
            FooterSource::LastSignatureTable => return Err(SigFooterError::NoSignatureTable),
            FooterSource::LastTable => log::warn!(
                "last table does not match the signature marker '{}'; relocating it anyway",
                settings.marker
            ),
        }
    }

    Ok(FooterSourceSelection {
        table,
        is_signature_table: qualifies,
    })
}
