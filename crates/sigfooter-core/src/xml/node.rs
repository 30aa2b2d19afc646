use super::xname::{XAttribute, XName};

#[derive(Clone, Debug)]
pub enum XmlNodeData {
    Element {
        name: XName,
        attributes: Vec<XAttribute>,
    },
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction { target: String, data: String },
}

impl XmlNodeData {
    pub fn element(name: XName) -> Self {
        Self::Element {
            name,
            attributes: Vec::new(),
        }
    }

    pub fn element_with_attrs(name: XName, attributes: Vec<XAttribute>) -> Self {
        Self::Element { name, attributes }
    }

    pub fn text(content: &str) -> Self {
        Self::Text(content.to_string())
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element { .. })
    }

    /// Element test by namespace URI and local name.
    pub fn is_named(&self, namespace: &str, local_name: &str) -> bool {
        self.name().is_some_and(|n| n.is(namespace, local_name))
    }

    /// Text or CDATA consisting only of XML whitespace. Such nodes between
    /// block elements carry no content.
    pub fn is_insignificant_whitespace(&self) -> bool {
        self.text_content()
            .is_some_and(|s| s.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n')))
    }

    pub fn name(&self) -> Option<&XName> {
        match self {
            Self::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn attributes(&self) -> Option<&[XAttribute]> {
        match self {
            Self::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn attributes_mut(&mut self) -> Option<&mut Vec<XAttribute>> {
        match self {
            Self::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn attribute(&self, name: &XName) -> Option<&str> {
        self.attributes()?
            .iter()
            .find(|a| &a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn text_content(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::CData(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_matches_by_namespace_and_local_name() {
        let node = XmlNodeData::element(XName::new("urn:w", "tbl"));
        assert!(node.is_named("urn:w", "tbl"));
        assert!(!node.is_named("urn:other", "tbl"));
        assert!(!node.is_named("urn:w", "tr"));
    }

    #[test]
    fn whitespace_text_is_insignificant() {
        assert!(XmlNodeData::text("\n    ").is_insignificant_whitespace());
        assert!(!XmlNodeData::text(" x ").is_insignificant_whitespace());
        assert!(!XmlNodeData::element(XName::local("p")).is_insignificant_whitespace());
    }

    #[test]
    fn attribute_lookup_by_name() {
        let node = XmlNodeData::element_with_attrs(
            XName::local("Override"),
            vec![XAttribute::new(XName::local("PartName"), "/word/footer1.xml")],
        );
        assert_eq!(
            node.attribute(&XName::local("PartName")),
            Some("/word/footer1.xml")
        );
        assert_eq!(node.attribute(&XName::local("ContentType")), None);
    }
}
