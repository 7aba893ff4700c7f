//! Error types for the editor

use thiserror::Error;

/// Why a command left the document unchanged.
///
/// Rejections are expected outcomes of interactive editing (a drag onto a
/// locked column, a stale id) and never surface as failures from
/// [`crate::Command::apply`]; they exist for diagnostics and tests.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Index {index} out of range for {container} (len {len})")]
    IndexOutOfRange {
        container: String,
        index: usize,
        len: usize,
    },

    #[error("Node is locked: {0}")]
    Locked(String),

    #[error("Id already in use: {0}")]
    DuplicateId(String),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Command would not change the document")]
    Unchanged,
}

impl Rejection {
    pub(crate) fn not_found(kind: &'static str, id: &str) -> Self {
        Rejection::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Why a palette item cannot be dropped where it was released
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DropRejection {
    #[error("Content blocks can only be dropped into a column, not onto {target}")]
    BlockOutsideColumn { target: String },

    #[error("{item} cannot be dropped onto {target}")]
    InvalidTarget { item: String, target: String },

    #[error("Drop target not found: {0}")]
    TargetNotFound(String),

    #[error("Drop target is locked: {0}")]
    Locked(String),

    #[error("Unsupported column count: {0}")]
    InvalidColumnCount(usize),
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Schema(#[from] mailforge_schema::SchemaError),

    #[error("Drop rejected: {0}")]
    Drop(#[from] DropRejection),

    #[error("Upload failed: {0}")]
    Upload(#[from] crate::upload::UploadError),
}
