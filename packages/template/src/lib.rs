//! # Mailforge Template
//!
//! `{{ dotted.path }}` interpolation against a variable bag.
//!
//! - Paths traverse nested objects and index arrays (`items[0].title` or `items.0.title`)
//! - Unresolved paths are left as literal placeholder text, never blanked
//! - [`substitute_object`] lets a placeholder that is the whole string yield a
//!   structured value, and [`deep_substitute`] applies that through nested props

mod path;
mod substitute;

pub use path::{lookup, parse_path, PathSegment};
pub use substitute::{
    deep_substitute, has_placeholders, placeholders, substitute, substitute_object, unresolved,
    Placeholder,
};
