use std::fmt;

/// Namespace of `xmlns:prefix="uri"` declarations when they are stored as attributes.
pub const XMLNS_NS: &str = "http://www.w3.org/2000/xmlns/";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct XName {
    pub namespace: Option<String>,
    pub local_name: String,
}

impl XName {
    pub fn new(namespace: &str, local_name: &str) -> Self {
        Self {
            namespace: if namespace.is_empty() {
                None
            } else {
                Some(namespace.to_string())
            },
            local_name: local_name.to_string(),
        }
    }

    pub fn local(local_name: &str) -> Self {
        Self {
            namespace: None,
            local_name: local_name.to_string(),
        }
    }

    /// Name of an `xmlns:prefix` declaration attribute.
    pub fn xmlns(prefix: &str) -> Self {
        Self::new(XMLNS_NS, prefix)
    }

    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace.as_deref().unwrap_or("") == namespace
    }
}

impl fmt::Display for XName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XAttribute {
    pub name: XName,
    pub value: String,
}

impl XAttribute {
    pub fn new(name: XName, value: &str) -> Self {
        Self {
            name,
            value: value.to_string(),
        }
    }

    /// True for `xmlns="..."` and `xmlns:prefix="..."`.
    pub fn is_namespace_declaration(&self) -> bool {
        (self.name.namespace.is_none() && self.name.local_name == "xmlns")
            || self.name.namespace.as_deref() == Some(XMLNS_NS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xname_with_namespace_displays_in_clark_notation() {
        let name = XName::new("http://example.com", "tbl");
        assert_eq!(name.to_string(), "{http://example.com}tbl");
    }

    #[test]
    fn empty_namespace_is_treated_as_none() {
        let name = XName::new("", "Relationship");
        assert_eq!(name, XName::local("Relationship"));
        assert!(name.is("", "Relationship"));
    }

    #[test]
    fn namespace_declarations_are_recognized() {
        assert!(XAttribute::new(XName::xmlns("w"), "urn:w").is_namespace_declaration());
        assert!(XAttribute::new(XName::local("xmlns"), "urn:d").is_namespace_declaration());
        assert!(!XAttribute::new(XName::local("Id"), "rId1").is_namespace_declaration());
    }
}
