mod cleanup;
mod document;
mod footer;
mod locator;
mod relocator;
mod sanitize;
mod sections;
mod settings;
mod validation;

pub use cleanup::{is_empty_paragraph, trim_trailing_empty_paragraphs};
pub use document::{find_document_body, require_document_body, WmlDocument};
pub use footer::{build_footer, relationship_references, FooterPart};
pub use locator::{
    find_marked_tables, find_signature_tables, find_tables, has_marker, is_signature_table,
    select_footer_source, FooterSourceSelection,
};
pub use relocator::{FooterRelocator, RelocationReport};
pub use sanitize::{strip_signature_decoration, StripCounts};
pub use sections::{apply_section_properties, SectionStats};
pub use settings::{FooterSource, PageMargins, RelocationSettings};
pub use validation::{validate_package, ValidationWarning};
