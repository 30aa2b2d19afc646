use crate::xml::arena::XmlDocument;
use crate::xml::namespaces::{V, W};
use indextree::NodeId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StripCounts {
    pub drawings: usize,
    pub pictures: usize,
    pub shadings: usize,
}

impl std::ops::AddAssign for StripCounts {
    fn add_assign(&mut self, other: Self) {
        self.drawings += other.drawings;
        self.pictures += other.pictures;
        self.shadings += other.shadings;
    }
}

/// Remove embedded images and `fill`-colored shading from the subtree at `tbl`.
///
/// Drops every `w:drawing`, every legacy `w:pict` that holds `v:imagedata`,
/// and every `w:shd` whose `w:fill` equals `fill` (hex colors compare without
/// case). Rows, cells and text stay where they are.
pub fn strip_signature_decoration(doc: &mut XmlDocument, tbl: NodeId, fill: &str) -> StripCounts {
    let drawings: Vec<_> = doc.find_elements(tbl, W::NS, "drawing").collect();
    let pictures: Vec<_> = doc
        .find_elements(tbl, W::NS, "pict")
        .filter(|&pict| doc.find_elements(pict, V::NS, "imagedata").next().is_some())
        .collect();
    let fill_attr = W::fill();
    let shadings: Vec<_> = doc
        .find_elements(tbl, W::NS, "shd")
        .filter(|&shd| {
            doc.attribute(shd, &fill_attr)
                .is_some_and(|value| value.eq_ignore_ascii_case(fill))
        })
        .collect();

    StripCounts {
        drawings: remove_all(doc, drawings),
        pictures: remove_all(doc, pictures),
        shadings: remove_all(doc, shadings),
    }
}

/// Remove each node still attached; a node inside an already removed subtree
/// is skipped.
fn remove_all(doc: &mut XmlDocument, nodes: Vec<NodeId>) -> usize {
    let mut removed = 0;
    for node in nodes {
        if doc.get(node).is_some() {
            doc.remove_subtree(node);
            removed += 1;
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::builder::serialize;
    use crate::xml::parser::parse;

    const TABLE: &str = r#"<w:tbl xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:v="urn:schemas-microsoft-com:vml"><w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr><w:tr><w:tc><w:tcPr><w:shd w:val="clear" w:color="auto" w:fill="FCE9D9"/></w:tcPr><w:p><w:r><w:t>COMPANY</w:t></w:r><w:r><w:drawing><a:graphic><a:blip r:embed="rId7"/></a:graphic></w:drawing></w:r></w:p></w:tc><w:tc><w:tcPr><w:shd w:val="clear" w:color="auto" w:fill="fce9d9"/></w:tcPr><w:p><w:r><w:pict><v:shape><v:imagedata r:id="rId8"/></v:shape></w:pict></w:r></w:p></w:tc><w:tc><w:tcPr><w:shd w:val="clear" w:color="auto" w:fill="D9D9D9"/></w:tcPr><w:p><w:r><w:pict><v:line/></w:pict></w:r></w:p></w:tc></w:tr></w:tbl>"#;

    #[test]
    fn strips_images_and_matching_shading_only() {
        let mut doc = parse(TABLE).unwrap();
        let tbl = doc.root().unwrap();

        let counts = strip_signature_decoration(&mut doc, tbl, "FCE9D9");
        assert_eq!(
            counts,
            StripCounts {
                drawings: 1,
                pictures: 1,
                shadings: 2
            }
        );

        let xml = serialize(&doc).unwrap();
        assert!(!xml.contains("w:drawing"));
        assert!(!xml.contains("imagedata"));
        assert!(!xml.to_ascii_uppercase().contains("FCE9D9"));
        assert!(xml.contains(r#"w:fill="D9D9D9""#));
        assert!(xml.contains("<v:line/>"));
        assert!(xml.contains("<w:t>COMPANY</w:t>"));
        assert_eq!(doc.find_elements(tbl, W::NS, "tc").count(), 3);
    }

    #[test]
    fn stripping_twice_is_a_no_op() {
        let mut doc = parse(TABLE).unwrap();
        let tbl = doc.root().unwrap();
        strip_signature_decoration(&mut doc, tbl, "FCE9D9");
        let second = strip_signature_decoration(&mut doc, tbl, "FCE9D9");
        assert_eq!(second, StripCounts::default());
    }
}
