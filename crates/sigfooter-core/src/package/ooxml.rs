use crate::error::{Result, SigFooterError};
use crate::xml::XmlDocument;
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use super::content_types::CONTENT_TYPES_PART;

struct Entry {
    name: String,
    /// Index in the source archive; `None` for parts added after opening.
    source_index: Option<usize>,
}

/// A zip-packaged OPC container held in memory.
///
/// Parts keep their archive order. Parts that were never replaced are copied
/// from the source archive without recompression, so their bytes survive a
/// save unchanged.
pub struct OoxmlPackage {
    source: Vec<u8>,
    entries: Vec<Entry>,
    parts: HashMap<String, Vec<u8>>,
    modified: HashSet<String>,
}

impl OoxmlPackage {
    /// Empty package with no source archive.
    pub fn new() -> Self {
        Self {
            source: Vec::new(),
            entries: Vec::new(),
            parts: HashMap::new(),
            modified: HashSet::new(),
        }
    }

    pub fn open(bytes: &[u8]) -> Result<Self> {
        let corrupt = |message: String| SigFooterError::CorruptArchive { message };

        let mut archive =
            ZipArchive::new(Cursor::new(bytes)).map_err(|e| corrupt(e.to_string()))?;

        let mut entries = Vec::with_capacity(archive.len());
        let mut parts = HashMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i).map_err(|e| corrupt(e.to_string()))?;
            let name = file.name().to_string();
            let mut content = Vec::new();
            if !file.is_dir() {
                file.read_to_end(&mut content)
                    .map_err(|e| corrupt(format!("{}: {}", name, e)))?;
            }
            entries.push(Entry {
                name: name.clone(),
                source_index: Some(i),
            });
            parts.insert(name, content);
        }

        if !parts.contains_key(CONTENT_TYPES_PART) {
            return Err(SigFooterError::missing_part(CONTENT_TYPES_PART));
        }

        log::debug!("opened package with {} entries", entries.len());

        Ok(Self {
            source: bytes.to_vec(),
            entries,
            parts,
            modified: HashSet::new(),
        })
    }

    pub fn open_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::open(&bytes)
    }

    pub fn save(&self) -> Result<Vec<u8>> {
        let mut source_archive = if self.source.is_empty() {
            None
        } else {
            Some(ZipArchive::new(Cursor::new(self.source.as_slice()))?)
        };

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in &self.entries {
            let untouched = !self.modified.contains(&entry.name);
            match (entry.source_index, source_archive.as_mut()) {
                (Some(index), Some(archive)) if untouched => {
                    writer.raw_copy_file(archive.by_index_raw(index)?)?;
                }
                _ => {
                    let content = self.parts.get(&entry.name).map(Vec::as_slice).unwrap_or(&[]);
                    writer.start_file(entry.name.as_str(), options)?;
                    writer.write_all(content)?;
                }
            }
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Replace `path` with the saved archive. The new content is written to a
    /// temporary file beside `path` and renamed over it only once complete.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let bytes = self.save()?;
        write_atomic(path, &bytes)
    }

    pub fn get_part(&self, path: &str) -> Option<&[u8]> {
        self.parts.get(path).map(|v| v.as_slice())
    }

    pub fn has_part(&self, path: &str) -> bool {
        self.parts.contains_key(path)
    }

    pub fn get_xml_part(&self, path: &str) -> Result<XmlDocument> {
        let bytes = self
            .get_part(path)
            .ok_or_else(|| SigFooterError::missing_part(path))?;
        crate::xml::parser::parse_bytes(bytes).map_err(|e| e.in_part(path))
    }

    pub fn set_part(&mut self, path: &str, content: Vec<u8>) {
        if !self.parts.contains_key(path) {
            self.entries.push(Entry {
                name: path.to_string(),
                source_index: None,
            });
        }
        self.parts.insert(path.to_string(), content);
        self.modified.insert(path.to_string());
    }

    /// Part names in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}

impl Default for OoxmlPackage {
    fn default() -> Self {
        Self::new()
    }
}

pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}
