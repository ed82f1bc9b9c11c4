/// Convenience result type used across the filter pipeline.
pub type FilterResult<T> = Result<T, FilterError>;

/// Error taxonomy shared by every filter and by chain configuration.
///
/// None of these are fatal: a failing filter leaves the pixels it would have
/// touched exactly as they were, so a chain may skip it and carry on.
#[derive(thiserror::Error, Debug)]
pub enum FilterError {
    /// Requested region lies outside the buffer, or pixel data could not be read.
    #[error("buffer access error: {0}")]
    BufferAccess(String),

    /// Invalid combination of filter configuration and apply arguments.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed input data (raw buffer sizes, chain descriptions).
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FilterError {
    /// Build a [`FilterError::BufferAccess`] value.
    pub fn buffer_access(msg: impl Into<String>) -> Self {
        Self::BufferAccess(msg.into())
    }

    /// Build a [`FilterError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`FilterError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
