use crate::error::RenderError;

/// Result type shared by every renderer
pub type RenderResult<T> = Result<T, RenderError>;
