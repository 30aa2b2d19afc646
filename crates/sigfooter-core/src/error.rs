use thiserror::Error;

#[derive(Error, Debug)]
pub enum SigFooterError {
    #[error("Corrupt archive: {message}")]
    CorruptArchive { message: String },

    #[error("Malformed XML in '{part}' at {location}: {message}")]
    MalformedDocument {
        part: String,
        message: String,
        location: String,
    },

    #[error("XML serialization error: {0}")]
    XmlWrite(String),

    #[error("Required element <{element}> not found in '{part}'")]
    ElementNotFound { element: String, part: String },

    #[error("Relationship '{id}' in '{part}' conflicts with an existing relationship")]
    RelationshipConflict { id: String, part: String },

    #[error("Invalid settings in '{origin}': {message}")]
    Config { origin: String, message: String },

    #[error("Last table in the document body is not a signature table")]
    NoSignatureTable,

    #[error("Document body contains no table to extract")]
    NoTableToExtract,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

impl SigFooterError {
    pub fn missing_part(part_path: &str) -> Self {
        Self::CorruptArchive {
            message: format!("missing required part '{}'", part_path),
        }
    }

    pub fn element_not_found(element: &str, part: &str) -> Self {
        Self::ElementNotFound {
            element: element.to_string(),
            part: part.to_string(),
        }
    }

    pub fn relationship_conflict(id: &str, part: &str) -> Self {
        Self::RelationshipConflict {
            id: id.to_string(),
            part: part.to_string(),
        }
    }

    /// Attach the part name to an error raised before the part was known.
    pub(crate) fn in_part(self, part_name: &str) -> Self {
        match self {
            Self::MalformedDocument {
                message, location, ..
            } => Self::MalformedDocument {
                part: part_name.to_string(),
                message,
                location,
            },
            Self::ElementNotFound { element, .. } => Self::ElementNotFound {
                element,
                part: part_name.to_string(),
            },
            Self::RelationshipConflict { id, .. } => Self::RelationshipConflict {
                id,
                part: part_name.to_string(),
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, SigFooterError>;
