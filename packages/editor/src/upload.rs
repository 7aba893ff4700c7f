//! Async boundary to the host's file storage.
//!
//! The editor awaits the uploader once per request and applies no retry or
//! timeout policy of its own.

use std::future::Future;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("Upload transport failed: {0}")]
    Transport(String),

    #[error("Not an image block: {0}")]
    NotAnImage(String),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Block is locked: {0}")]
    Locked(String),
}

/// Stores a file and resolves to its public URL
pub trait Uploader {
    fn upload(&self, file: UploadedFile) -> impl Future<Output = Result<String, UploadError>>;
}
