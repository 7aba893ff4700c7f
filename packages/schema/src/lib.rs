//! # Mailforge Schema
//!
//! Canonical email document tree and its validation.
//!
//! ```text
//! Document
//!  └─ Section (rows)
//!      └─ Row (columns, gutter)
//!          └─ Column (blocks)
//!              └─ ContentBlock: button | text | heading | divider | image | custom
//! ```
//!
//! Every node carries a globally unique `id` and per-node `locked`/`hidden`
//! flags. Validation is offered in two shapes that share one implementation:
//!
//! - [`validate`] returns every [`FieldError`] found, addressed by field path
//! - [`parse`] / [`parse_str`] return a single [`SchemaError`] suitable for `?`
//! - [`is_document`] is a boolean guard built on [`validate`]

mod blocks;
mod document;
mod error;
mod id_generator;
mod style;
mod validate;

pub use blocks::{
    BlockKind, BlockNode, BorderStyle, ButtonProps, ContentBlock, CustomBlockProps, DividerProps,
    FontWeight, HeadingLevel, HeadingProps, ImageProps, TextProps,
};
pub use document::{
    Column, ContainerKind, Document, DocumentMeta, NodeCounts, Row, Section, VariableBag,
    SCHEMA_VERSION,
};
pub use error::{FieldError, IssueCode, SchemaError, SchemaResult, ValidationErrors};
pub use id_generator::{document_seed, IdGenerator};
pub use style::{Align, FontDefinition, Spacing, SpacingSides, Theme, VerticalAlign, WebFont};
pub use validate::validate;

use serde_json::Value;

/// Validate `input`, collapsing failures into a [`SchemaError`]
pub fn parse(input: &Value) -> SchemaResult<Document> {
    Ok(validate(input)?)
}

/// Parse JSON text and validate it
pub fn parse_str(json: &str) -> SchemaResult<Document> {
    let value: Value = serde_json::from_str(json)?;
    parse(&value)
}

/// Whether `input` is a valid document
pub fn is_document(input: &Value) -> bool {
    validate(input).is_ok()
}
