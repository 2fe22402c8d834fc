/// Convenience result type used across glitchfx.
pub type GlitchResult<T> = Result<T, GlitchError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum GlitchError {
    /// A fraction or intensity argument outside `[0, 1]`.
    #[error("range error: {what} must be within [0, 1], got {value}")]
    Range {
        /// Name of the offending argument.
        what: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A channel index that does not exist in the buffer.
    #[error("invalid channel: index {channel} but buffer has {channels} channels")]
    InvalidChannel {
        /// Requested channel index.
        channel: usize,
        /// Channel count of the buffer.
        channels: usize,
    },

    /// Malformed shapes or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Decode/encode process or pipe failure.
    #[error("stream error: {0}")]
    Stream(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlitchError {
    /// Build a [`GlitchError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GlitchError::Stream`] value.
    pub fn stream(msg: impl Into<String>) -> Self {
        Self::Stream(msg.into())
    }

    /// Build a [`GlitchError::Range`] value.
    pub fn range(what: &'static str, value: f64) -> Self {
        Self::Range { what, value }
    }
}

/// Return `Ok(value)` when `value` lies in `[0, 1]`, else a [`GlitchError::Range`].
pub(crate) fn check_unit(what: &'static str, value: f64) -> GlitchResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(GlitchError::range(what, value))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
