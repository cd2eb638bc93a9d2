/// Convenience result type used across layerfill.
pub type LayerfillResult<T> = Result<T, LayerfillError>;

/// Top-level error taxonomy used by the rendering and batch APIs.
#[derive(thiserror::Error, Debug)]
pub enum LayerfillError {
    /// Fatal setup problems detected before any rendering starts.
    #[error("configuration error: {0}")]
    Config(String),

    /// Pre-flight validation failed; one message per problem.
    #[error("validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A font file could not be opened or registered.
    #[error("font error: {0}")]
    Font(String),

    /// A single row or layer failed to render.
    #[error("render error: {0}")]
    Render(String),

    /// Encoding or writing an output image failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayerfillError {
    /// Build a [`LayerfillError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`LayerfillError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`LayerfillError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`LayerfillError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
