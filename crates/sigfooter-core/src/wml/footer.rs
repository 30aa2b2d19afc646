use super::sanitize::{strip_signature_decoration, StripCounts};
use crate::xml::arena::XmlDocument;
use crate::xml::namespaces::{FOOTER_IGNORABLE, FOOTER_NAMESPACES, MC, R, W};
use crate::xml::{XAttribute, XName, XmlNodeData};
use indextree::NodeId;
use std::collections::BTreeSet;

pub struct FooterPart {
    pub document: XmlDocument,
    /// The cleaned table inside `document`.
    pub table: NodeId,
    pub stripped: StripCounts,
}

/// Build a `w:ftr` part whose only content is a cleaned copy of `table`.
///
/// The copy keeps every namespace declaration that was in scope for the
/// source table, so prefixes used inside it stay bound.
pub fn build_footer(source: &XmlDocument, table: NodeId, shading_fill: &str) -> FooterPart {
    let mut document = XmlDocument::new();
    let root = document.add_root(XmlNodeData::element_with_attrs(
        W::ftr(),
        footer_root_attributes(source, table),
    ));

    let copy = match document.append_imported(root, source, table) {
        Some(copy) => copy,
        // The handle came from `source`, so this only happens for a removed node.
        None => document.add_child(root, XmlNodeData::element(W::tbl())),
    };
    let stripped = strip_signature_decoration(&mut document, copy, shading_fill);

    FooterPart {
        document,
        table: copy,
        stripped,
    }
}

fn footer_root_attributes(source: &XmlDocument, table: NodeId) -> Vec<XAttribute> {
    let mut attributes: Vec<XAttribute> = FOOTER_NAMESPACES
        .iter()
        .map(|(prefix, uri)| XAttribute::new(XName::xmlns(prefix), uri))
        .collect();

    for ancestor in source.ancestors(table).skip(1) {
        let Some(attrs) = source.get(ancestor).and_then(|d| d.attributes()) else {
            continue;
        };
        for attr in attrs.iter().filter(|a| a.is_namespace_declaration()) {
            // Only prefixed declarations; the footer has no default namespace.
            if attr.name.namespace.is_none() {
                continue;
            }
            if !attributes.iter().any(|a| a.name == attr.name) {
                attributes.push(attr.clone());
            }
        }
    }

    attributes.push(XAttribute::new(MC::Ignorable(), FOOTER_IGNORABLE));
    attributes
}

/// Relationship ids referenced from the subtree at `node` (`r:id`, `r:embed`, ...).
pub fn relationship_references(doc: &XmlDocument, node: NodeId) -> BTreeSet<String> {
    doc.descendants(node)
        .filter_map(|id| doc.get(id).and_then(|d| d.attributes()))
        .flatten()
        .filter(|attr| attr.name.namespace.as_deref() == Some(R::NS))
        .map(|attr| attr.value.clone())
        .collect()
}
