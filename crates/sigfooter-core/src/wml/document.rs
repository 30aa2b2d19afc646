use crate::error::{Result, SigFooterError};
use crate::package::relationships::{self, relationship_types};
use crate::package::{OoxmlPackage, CONTENT_TYPES_PART};
use crate::xml::arena::XmlDocument;
use crate::xml::namespaces::W;
use indextree::NodeId;
use std::path::Path;

const DEFAULT_MAIN_PART: &str = "word/document.xml";
const PACKAGE_RELATIONSHIPS: &str = "_rels/.rels";

/// A WordprocessingML package with its main document part resolved.
pub struct WmlDocument {
    package: OoxmlPackage,
    main_part: String,
}

impl WmlDocument {
    /// Minimal package around a main document part and its relationships
    /// (useful for testing).
    pub fn from_parts(main_xml: &[u8], document_rels_xml: &[u8]) -> Result<Self> {
        let mut package = OoxmlPackage::new();
        package.set_part(CONTENT_TYPES_PART, br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#.to_vec());
        package.set_part(PACKAGE_RELATIONSHIPS, br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#.to_vec());
        package.set_part(DEFAULT_MAIN_PART, main_xml.to_vec());
        package.set_part(
            &relationships::relationships_part_for(DEFAULT_MAIN_PART),
            document_rels_xml.to_vec(),
        );

        Self::from_bytes(&package.save()?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_package(OoxmlPackage::open(bytes)?)
    }

    pub fn open_path(path: &Path) -> Result<Self> {
        Self::from_package(OoxmlPackage::open_path(path)?)
    }

    pub fn from_package(package: OoxmlPackage) -> Result<Self> {
        let main_part = resolve_main_part(&package)?;
        if !package.has_part(&main_part) {
            return Err(SigFooterError::missing_part(&main_part));
        }
        let rels_part = relationships::relationships_part_for(&main_part);
        if !package.has_part(&rels_part) {
            return Err(SigFooterError::missing_part(&rels_part));
        }
        Ok(Self { package, main_part })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.package.save()
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        self.package.save_to_path(path)
    }

    pub fn package(&self) -> &OoxmlPackage {
        &self.package
    }

    pub fn package_mut(&mut self) -> &mut OoxmlPackage {
        &mut self.package
    }

    pub fn main_part_name(&self) -> &str {
        &self.main_part
    }

    pub fn main_relationships_part(&self) -> String {
        relationships::relationships_part_for(&self.main_part)
    }

    /// Package path of a part stored in the main document's directory.
    pub fn sibling_part(&self, file_name: &str) -> String {
        relationships::resolve_target(&self.main_part, file_name)
    }

    pub fn main_document(&self) -> Result<XmlDocument> {
        self.package.get_xml_part(&self.main_part)
    }
}

fn resolve_main_part(package: &OoxmlPackage) -> Result<String> {
    if !package.has_part(PACKAGE_RELATIONSHIPS) {
        return Ok(DEFAULT_MAIN_PART.to_string());
    }
    let rels = relationships::parse_relationships(&package.get_xml_part(PACKAGE_RELATIONSHIPS)?)
        .map_err(|e| e.in_part(PACKAGE_RELATIONSHIPS))?;
    Ok(rels
        .iter()
        .find(|rel| rel.rel_type == relationship_types::OFFICE_DOCUMENT)
        .map(|rel| relationships::resolve_target("", &rel.target))
        .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string()))
}

pub fn find_document_body(doc: &XmlDocument) -> Option<NodeId> {
    let root = doc.root()?;
    doc.child_elements(root)
        .find(|&child| doc.is_named(child, W::NS, "body"))
}

pub fn require_document_body(doc: &XmlDocument, part: &str) -> Result<NodeId> {
    find_document_body(doc).ok_or_else(|| SigFooterError::element_not_found("w:body", part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parser::parse;

    const EMPTY_RELS: &[u8] = br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"/>"#;

    #[test]
    fn main_part_is_resolved_from_package_relationships() {
        let doc = WmlDocument::from_parts(
            br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body/></w:document>"#,
            EMPTY_RELS,
        )
        .unwrap();

        assert_eq!(doc.main_part_name(), "word/document.xml");
        assert_eq!(doc.main_relationships_part(), "word/_rels/document.xml.rels");
        assert_eq!(doc.sibling_part("footer1.xml"), "word/footer1.xml");
    }

    #[test]
    fn missing_document_relationships_is_corrupt() {
        let mut package = OoxmlPackage::new();
        package.set_part(CONTENT_TYPES_PART, b"<Types/>".to_vec());
        package.set_part(DEFAULT_MAIN_PART, b"<document/>".to_vec());
        let bytes = package.save().unwrap();

        let err = WmlDocument::from_bytes(&bytes).err().unwrap();
        assert!(matches!(err, SigFooterError::CorruptArchive { .. }));
        assert!(err.to_string().contains("document.xml.rels"));
    }

    #[test]
    fn body_lookup() {
        let doc = parse(r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p/></w:body></w:document>"#).unwrap();
        assert!(find_document_body(&doc).is_some());

        let no_body = parse(r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#).unwrap();
        let err = require_document_body(&no_body, "word/document.xml").unwrap_err();
        assert!(matches!(err, SigFooterError::ElementNotFound { .. }));
    }
}
