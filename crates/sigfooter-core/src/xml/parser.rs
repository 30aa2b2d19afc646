use super::arena::XmlDocument;
use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use crate::error::{Result, SigFooterError};

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

pub fn parse(xml: &str) -> Result<XmlDocument> {
    parse_bytes(xml.as_bytes())
}

/// Parse a UTF-8 XML part. The returned error carries no part name; callers
/// that know it attach it with `SigFooterError::in_part`.
pub fn parse_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let text = std::str::from_utf8(bytes).map_err(|e| SigFooterError::MalformedDocument {
        part: String::new(),
        message: e.to_string(),
        location: format!("byte {}", e.valid_up_to()),
    })?;
    // A UTF-8 byte order mark is legal in package parts but not in roxmltree input.
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let doc = roxmltree::Document::parse_with_options(
        text,
        roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        },
    )
    .map_err(|e| SigFooterError::MalformedDocument {
        part: String::new(),
        message: e.to_string(),
        location: format!("line {}", e.pos().row),
    })?;

    let mut xml_doc = XmlDocument::new();
    build_tree(doc.root_element(), &mut xml_doc, None);
    Ok(xml_doc)
}

fn build_tree(
    node: roxmltree::Node,
    doc: &mut XmlDocument,
    parent: Option<indextree::NodeId>,
) {
    let node_data = match node.node_type() {
        roxmltree::NodeType::Element => {
            let name = XName::new(
                node.tag_name().namespace().unwrap_or(""),
                node.tag_name().name(),
            );

            let mut attributes: Vec<XAttribute> = node
                .attributes()
                .map(|attr| {
                    XAttribute::new(
                        XName::new(attr.namespace().unwrap_or(""), attr.name()),
                        attr.value(),
                    )
                })
                .collect();

            // roxmltree reports every namespace in scope; keep only those this
            // element declares so the serializer does not repeat them on each node.
            for ns in node.namespaces() {
                if ns.name() == Some("xml") || ns.uri() == XML_NS {
                    continue;
                }
                let inherited = node.parent_element().is_some_and(|p| {
                    p.namespaces()
                        .any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri())
                });
                if inherited {
                    continue;
                }
                let decl_name = match ns.name() {
                    Some(prefix) => XName::xmlns(prefix),
                    None => XName::local("xmlns"),
                };
                attributes.push(XAttribute::new(decl_name, ns.uri()));
            }

            XmlNodeData::Element { name, attributes }
        }
        roxmltree::NodeType::Text => match node.text() {
            Some(text) => XmlNodeData::Text(text.to_string()),
            None => return,
        },
        roxmltree::NodeType::Comment => match node.text() {
            Some(text) => XmlNodeData::Comment(text.to_string()),
            None => return,
        },
        roxmltree::NodeType::PI => XmlNodeData::ProcessingInstruction {
            target: node.pi().map(|pi| pi.target.to_string()).unwrap_or_default(),
            data: node
                .pi()
                .and_then(|pi| pi.value.map(|s| s.to_string()))
                .unwrap_or_default(),
        },
        _ => return,
    };

    let new_id = match parent {
        Some(parent_id) => doc.add_child(parent_id, node_data),
        None => doc.add_root(node_data),
    };

    for child in node.children() {
        build_tree(child, doc, Some(new_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::namespaces::W;

    #[test]
    fn parse_wordprocessing_body() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:body><w:p><w:r><w:t>Hello</w:t></w:r></w:p></w:body>
        </w:document>"#;

        let doc = parse(xml).unwrap();
        let root = doc.root().unwrap();
        assert!(doc.is_named(root, W::NS, "document"));
        assert_eq!(doc.find_elements(root, W::NS, "t").count(), 1);
        assert_eq!(doc.text_content(root).trim(), "Hello");
    }

    #[test]
    fn namespace_declarations_stay_on_declaring_element() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p/></w:body></w:document>"#;
        let doc = parse(xml).unwrap();
        let root = doc.root().unwrap();

        let root_decls = doc
            .get(root)
            .unwrap()
            .attributes()
            .unwrap()
            .iter()
            .filter(|a| a.is_namespace_declaration())
            .count();
        assert_eq!(root_decls, 1);

        let body = doc.find_elements(root, W::NS, "body").next().unwrap();
        assert!(doc.get(body).unwrap().attributes().unwrap().is_empty());
    }

    #[test]
    fn byte_order_mark_is_accepted() {
        let doc = parse("\u{feff}<Types/>").unwrap();
        assert!(doc.root().is_some());
    }

    #[test]
    fn malformed_xml_is_rejected() {
        let err = parse("<w:tbl><w:tr></w:tbl>").unwrap_err();
        assert!(matches!(err, SigFooterError::MalformedDocument { .. }));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = parse_bytes(&[0x3c, 0x61, 0xff, 0x3e]).unwrap_err();
        assert!(matches!(err, SigFooterError::MalformedDocument { .. }));
    }
}
