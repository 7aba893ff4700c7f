//! # Mailforge React Compiler
//!
//! Two of the four render formats share this crate:
//!
//! - [`compile_to_element`] builds the in-memory element tree, a [`VNode`]
//!   whose tags are React-Email component names
//! - [`compile_to_react`] prints that same tree as a React-Email component
//!   module (imports, function component, JSX body)
//!
//! [`VNode`]: mailforge_common::VNode

mod compiler;
mod context;
mod element;

pub use compiler::{compile_to_react, is_valid_component_name, REACT_EMAIL_PACKAGE};
pub use element::compile_to_element;

#[cfg(test)]
mod tests;
