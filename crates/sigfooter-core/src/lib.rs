//! Moves the signature table at the end of a WordprocessingML document into
//! its page footer.
//!
//! The package is opened in memory, the main document part is edited as a
//! structural tree, and only the parts that changed are rewritten on save.

pub mod error;
pub mod package;
pub mod wml;
pub mod xml;

pub use error::{Result, SigFooterError};
pub use wml::{
    validate_package, FooterRelocator, FooterSource, PageMargins, RelocationReport,
    RelocationSettings, ValidationWarning, WmlDocument,
};

use std::path::Path;

/// Relocate the footer table of the package in `bytes` and return the new
/// package bytes.
pub fn process_bytes(
    bytes: &[u8],
    settings: &RelocationSettings,
) -> Result<(Vec<u8>, RelocationReport)> {
    let mut document = WmlDocument::from_bytes(bytes)?;
    let report = FooterRelocator::relocate(&mut document, settings)?;
    Ok((document.to_bytes()?, report))
}

/// Relocate the footer table of the package at `input` and write the result
/// to `output`, which may be the same path.
///
/// The output is replaced atomically. On error it is left as it was.
pub fn process_file(
    input: &Path,
    output: &Path,
    settings: &RelocationSettings,
) -> Result<RelocationReport> {
    log::info!("processing {}", input.display());
    let mut document = WmlDocument::open_path(input)?;
    let report = FooterRelocator::relocate(&mut document, settings)?;
    document.save_to_path(output)?;
    log::debug!("wrote {}", output.display());
    Ok(report)
}
