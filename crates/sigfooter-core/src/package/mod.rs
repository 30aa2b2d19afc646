pub mod content_types;
pub mod ooxml;
pub mod relationships;

pub use content_types::{ContentTypes, CONTENT_TYPES_PART};
pub use ooxml::{write_atomic, OoxmlPackage};
pub use relationships::{Relationship, TargetMode};
