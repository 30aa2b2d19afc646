use crate::error::{Result, SigFooterError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Page margins in twentieths of a point (twips).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMargins {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
    pub header: u32,
    pub footer: u32,
    pub gutter: u32,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top: 2160,
            right: 720,
            bottom: 1440,
            left: 720,
            header: 720,
            footer: 720,
            gutter: 0,
        }
    }
}

impl PageMargins {
    /// `w:pgMar` attributes in the order Word writes them.
    pub fn attributes(&self) -> [(&'static str, String); 7] {
        [
            ("top", self.top.to_string()),
            ("right", self.right.to_string()),
            ("bottom", self.bottom.to_string()),
            ("left", self.left.to_string()),
            ("header", self.header.to_string()),
            ("footer", self.footer.to_string()),
            ("gutter", self.gutter.to_string()),
        ]
    }
}

/// Which table becomes the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FooterSource {
    /// The last top-level table in the body, whether or not it carries the
    /// signature marker.
    #[default]
    LastTable,
    /// The last top-level table, which must qualify as a signature table.
    LastSignatureTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelocationSettings {
    /// Text a table must contain to count as a signature table.
    pub marker: String,

    /// Relationship ids of the signature images. A signature table references
    /// at least one of them.
    pub resource_ids: Vec<String>,

    /// `w:shd/@w:fill` value stripped from signature tables.
    pub shading_fill: String,

    pub margins: PageMargins,

    /// File name of the new footer part, placed beside the main document part.
    pub footer_part_name: String,

    /// Maximum number of empty paragraphs left at the end of the body.
    pub empty_paragraph_cap: usize,

    pub footer_source: FooterSource,
}

impl Default for RelocationSettings {
    fn default() -> Self {
        Self {
            marker: "COMPANY".to_string(),
            resource_ids: vec!["rId7".to_string(), "rId8".to_string(), "rId9".to_string()],
            shading_fill: "FCE9D9".to_string(),
            margins: PageMargins::default(),
            footer_part_name: "footer1.xml".to_string(),
            empty_paragraph_cap: 2,
            footer_source: FooterSource::default(),
        }
    }
}

impl RelocationSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::parse_json(json, "settings")
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::parse_json(&json, &path.display().to_string())
    }

    fn parse_json(json: &str, origin: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SigFooterError::Config {
            origin: origin.to_string(),
            message: e.to_string(),
        })
    }
}
