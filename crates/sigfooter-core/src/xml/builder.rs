use super::arena::XmlDocument;
use super::node::XmlNodeData;
use super::xname::{XAttribute, XName, XMLNS_NS};
use crate::error::{Result, SigFooterError};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashMap;
use std::io::Cursor;

pub fn serialize(doc: &XmlDocument) -> Result<String> {
    let bytes = serialize_bytes(doc)?;
    String::from_utf8(bytes).map_err(|e| SigFooterError::XmlWrite(e.to_string()))
}

pub fn serialize_bytes(doc: &XmlDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(write_error)?;
    // Word writes the root element on its own line after the declaration.
    writer
        .write_event(Event::Text(BytesText::from_escaped("\r\n")))
        .map_err(write_error)?;

    if let Some(root_id) = doc.root() {
        write_node(doc, root_id, &mut writer, &NamespaceMap::new())?;
    }

    Ok(writer.into_inner().into_inner())
}

/// Namespace URI -> prefix ("" for the default namespace).
type NamespaceMap = HashMap<String, String>;

fn write_error<E: std::fmt::Display>(e: E) -> SigFooterError {
    SigFooterError::XmlWrite(e.to_string())
}

fn extend_namespace_map(namespace_map: &mut NamespaceMap, attributes: &[XAttribute]) {
    for attr in attributes {
        if !attr.is_namespace_declaration() {
            continue;
        }
        let prefix = match attr.name.namespace {
            Some(_) => attr.name.local_name.clone(),
            None => String::new(),
        };
        // The innermost declaration wins.
        namespace_map.insert(attr.value.clone(), prefix);
    }
}

fn write_node<W: std::io::Write>(
    doc: &XmlDocument,
    node_id: indextree::NodeId,
    writer: &mut Writer<W>,
    namespace_map: &NamespaceMap,
) -> Result<()> {
    let Some(node_data) = doc.get(node_id) else {
        return Ok(());
    };

    match node_data {
        XmlNodeData::Element { name, attributes } => {
            write_element(doc, node_id, name, attributes, writer, namespace_map)?;
        }
        XmlNodeData::Text(text) => {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(write_error)?;
        }
        XmlNodeData::CData(text) => {
            writer
                .write_event(Event::CData(BytesCData::new(text)))
                .map_err(write_error)?;
        }
        XmlNodeData::Comment(text) => {
            writer
                .write_event(Event::Comment(BytesText::new(text)))
                .map_err(write_error)?;
        }
        XmlNodeData::ProcessingInstruction { target, data } => {
            let pi_content = if data.is_empty() {
                target.clone()
            } else {
                format!("{} {}", target, data)
            };
            writer
                .write_event(Event::PI(BytesPI::new(&pi_content)))
                .map_err(write_error)?;
        }
    }

    Ok(())
}

/// Qualified name for `namespace:local`. Declares the namespace on the
/// current element when nothing in scope binds it.
fn qualify(
    namespace: &str,
    local_name: &str,
    is_attribute: bool,
    scoped_map: &mut NamespaceMap,
    extra_decls: &mut Vec<(String, String)>,
) -> String {
    if namespace == XMLNS_NS {
        return format!("xmlns:{}", local_name);
    }
    if namespace == "http://www.w3.org/XML/1998/namespace" {
        return format!("xml:{}", local_name);
    }

    match scoped_map.get(namespace) {
        // Unprefixed attributes are never in the default namespace.
        Some(prefix) if prefix.is_empty() && !is_attribute => local_name.to_string(),
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, local_name),
        _ => {
            let prefix = match well_known_prefix(namespace) {
                Some(known) if !prefix_in_scope(scoped_map, known) => known.to_string(),
                _ => unused_prefix(scoped_map),
            };
            scoped_map.insert(namespace.to_string(), prefix.clone());
            extra_decls.push((format!("xmlns:{}", prefix), namespace.to_string()));
            format!("{}:{}", prefix, local_name)
        }
    }
}

fn prefix_in_scope(scoped_map: &NamespaceMap, prefix: &str) -> bool {
    scoped_map.values().any(|bound| bound == prefix)
}

/// `ns0`, `ns1`, ... whichever is first free in `scoped_map`.
fn unused_prefix(scoped_map: &NamespaceMap) -> String {
    let mut n = 0;
    loop {
        let candidate = format!("ns{}", n);
        if !prefix_in_scope(scoped_map, &candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn write_element<W: std::io::Write>(
    doc: &XmlDocument,
    node_id: indextree::NodeId,
    name: &XName,
    attributes: &[XAttribute],
    writer: &mut Writer<W>,
    namespace_map: &NamespaceMap,
) -> Result<()> {
    let mut scoped_map = namespace_map.clone();
    extend_namespace_map(&mut scoped_map, attributes);
    let mut extra_decls = Vec::new();

    let tag_name = match &name.namespace {
        Some(ns) => qualify(ns, &name.local_name, false, &mut scoped_map, &mut extra_decls),
        None => name.local_name.clone(),
    };

    let mut attr_pairs = Vec::with_capacity(attributes.len());
    for attr in attributes {
        let attr_name = if attr.name.namespace.is_none() {
            attr.name.local_name.clone()
        } else if attr.is_namespace_declaration() {
            format!("xmlns:{}", attr.name.local_name)
        } else {
            let ns = attr.name.namespace.as_deref().unwrap_or_default();
            qualify(ns, &attr.name.local_name, true, &mut scoped_map, &mut extra_decls)
        };
        attr_pairs.push((attr_name, attr.value.as_str()));
    }

    let mut elem = BytesStart::new(tag_name.as_str());
    for (decl, uri) in &extra_decls {
        elem.push_attribute((decl.as_str(), uri.as_str()));
    }
    for (attr_name, value) in &attr_pairs {
        elem.push_attribute((attr_name.as_str(), *value));
    }

    let mut children = doc.children(node_id).peekable();

    if children.peek().is_none() {
        writer.write_event(Event::Empty(elem)).map_err(write_error)?;
    } else {
        writer.write_event(Event::Start(elem)).map_err(write_error)?;

        for child_id in children {
            write_node(doc, child_id, writer, &scoped_map)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(tag_name.as_str())))
            .map_err(write_error)?;
    }

    Ok(())
}

fn well_known_prefix(namespace: &str) -> Option<&'static str> {
    let prefix = match namespace {
        "http://schemas.openxmlformats.org/wordprocessingml/2006/main" => "w",
        "http://schemas.microsoft.com/office/word/2010/wordml" => "w14",
        "http://schemas.microsoft.com/office/word/2012/wordml" => "w15",
        "http://schemas.openxmlformats.org/drawingml/2006/main" => "a",
        "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" => "wp",
        "http://schemas.openxmlformats.org/drawingml/2006/picture" => "pic",
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships" => "r",
        "http://schemas.openxmlformats.org/markup-compatibility/2006" => "mc",
        "urn:schemas-microsoft-com:vml" => "v",
        "urn:schemas-microsoft-com:office:office" => "o",
        _ => return None,
    };
    Some(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::namespaces::{R, W};
    use crate::xml::parser::parse;

    #[test]
    fn serialize_simple_document() {
        let mut doc = XmlDocument::new();
        let root = doc.add_root(XmlNodeData::element(XName::local("root")));
        doc.add_child(root, XmlNodeData::text("a < b & c"));

        let xml = serialize(&doc).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(xml.contains("<root>a &lt; b &amp; c</root>"));
    }

    #[test]
    fn childless_elements_self_close() {
        let mut doc = XmlDocument::new();
        doc.add_root(XmlNodeData::element(XName::local("empty")));

        let xml = serialize(&doc).unwrap();
        assert!(xml.contains("<empty/>"));
    }

    #[test]
    fn reparsed_output_keeps_prefixes() {
        let source = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body><w:p><w:r><w:t xml:space="preserve"> x </w:t></w:r></w:p><w:sectPr><w:footerReference w:type="default" r:id="rId3"/></w:sectPr></w:body></w:document>"#;
        let doc = parse(source).unwrap();
        let xml = serialize(&doc).unwrap();

        assert!(xml.contains(r#"<w:t xml:space="preserve"> x </w:t>"#));
        assert!(xml.contains(r#"<w:footerReference w:type="default" r:id="rId3"/>"#));
        assert_eq!(xml.matches("xmlns:w=").count(), 1);
    }

    #[test]
    fn default_namespace_elements_stay_unprefixed() {
        let source = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="t" Target="styles.xml"/></Relationships>"#;
        let doc = parse(source).unwrap();
        let xml = serialize(&doc).unwrap();
        assert!(xml.contains(r#"<Relationship Id="rId1" Type="t" Target="styles.xml"/>"#));
    }

    #[test]
    fn undeclared_namespace_is_declared_where_used() {
        let mut doc = XmlDocument::new();
        let root = doc.add_root(XmlNodeData::element(W::ftr()));
        let reference = doc.add_child(root, XmlNodeData::element(W::footerReference()));
        doc.set_attribute(reference, &R::id(), "rId9");

        let xml = serialize(&doc).unwrap();
        let reparsed = roxmltree::Document::parse(&xml).unwrap();
        let node = reparsed
            .descendants()
            .find(|n| n.has_tag_name((W::NS, "footerReference")))
            .unwrap();
        assert_eq!(node.attribute((R::NS, "id")), Some("rId9"));
    }

    #[test]
    fn unknown_namespaces_get_distinct_prefixes() {
        let mut doc = XmlDocument::new();
        let root = doc.add_root(XmlNodeData::element(W::ftr()));
        doc.set_attribute(root, &XName::new("urn:example:one", "a"), "1");
        doc.set_attribute(root, &XName::new("urn:example:two", "b"), "2");

        let xml = serialize(&doc).unwrap();
        assert!(xml.contains(r#"xmlns:ns0="urn:example:one""#));
        assert!(xml.contains(r#"xmlns:ns1="urn:example:two""#));

        let reparsed = roxmltree::Document::parse(&xml).unwrap();
        let root = reparsed.root_element();
        assert_eq!(root.attribute(("urn:example:one", "a")), Some("1"));
        assert_eq!(root.attribute(("urn:example:two", "b")), Some("2"));
    }
}
