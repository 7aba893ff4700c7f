pub mod context;
pub mod error;
pub mod escape;
pub mod options;
pub mod registry;
pub mod result;
pub mod style;
pub mod visitor;
pub mod vnode;

pub use context::*;
pub use error::*;
pub use escape::*;
pub use options::*;
pub use registry::*;
pub use result::*;
pub use style::{
    block_alignment, class_list, column_styles, daisyui_class, px, resolve_color, row_styles,
    section_styles, spacing_css, Styles,
};
pub use visitor::*;
pub use vnode::*;
