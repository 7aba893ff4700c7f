use thiserror::Error;

/// Errors that abort a render
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Custom block \"{0}\" not found in registry")]
    MissingCustomBlock(String),

    #[error("Invalid component name: {0:?} is not a valid JavaScript identifier")]
    InvalidComponentName(String),
}
