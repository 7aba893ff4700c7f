//! # Mailforge Render
//!
//! One entry point over the four output formats.
//!
//! ```text
//! Document ──┬─ html               → compile_to_html
//!            ├─ plain-text         → compile_to_text
//!            ├─ react-element      → compile_to_element
//!            └─ react-source-text  → compile_to_react
//! ```
//!
//! [`render_document`] is the typed API. [`render_request`] accepts the JSON
//! request shape `{ document, options }` that hosts send across a process or
//! wasm boundary, and answers with the format-tagged JSON output.

mod config;
mod output;
mod render;

pub use config::{Config, HistoryConfig, DEFAULT_CONFIG_NAME};
pub use mailforge_common::{
    CustomBlockDefinition, CustomBlockRegistry, RenderError, RenderFormat, RenderOptions, VNode,
};
pub use output::RenderOutput;
pub use render::{render_document, render_request, render_request_with_defaults, unresolved_variables};
