/// Convenience result type used across morphgif.
pub type GifResult<T> = Result<T, GifError>;

/// Error taxonomy shared by every pipeline stage.
#[derive(thiserror::Error, Debug)]
pub enum GifError {
    /// Unreadable or unsupported image bytes.
    #[error("decode error: {0}")]
    Decode(String),

    /// Image exceeds the configured ceiling or has zero area.
    #[error("dimension error: {0}")]
    Dimension(String),

    /// Unknown transition kind (strict parsing only).
    #[error("transition error: {0}")]
    Transition(String),

    /// Palette construction hit an input that cannot yield a palette.
    #[error("quantize error: {0}")]
    Quantize(String),

    /// Output container constraints violated.
    #[error("encode error: {0}")]
    Encode(String),

    /// Malformed request or configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The run was cancelled between stages.
    #[error("pipeline cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifError {
    /// Build a [`GifError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`GifError::Dimension`] value.
    pub fn dimension(msg: impl Into<String>) -> Self {
        Self::Dimension(msg.into())
    }

    /// Build a [`GifError::Transition`] value.
    pub fn transition(msg: impl Into<String>) -> Self {
        Self::Transition(msg.into())
    }

    /// Build a [`GifError::Quantize`] value.
    pub fn quantize(msg: impl Into<String>) -> Self {
        Self::Quantize(msg.into())
    }

    /// Build a [`GifError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`GifError::InvalidRequest`] value.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// HTTP status the boundary layer should answer with for this failure.
    ///
    /// Client-side problems (bad bytes, oversize images, malformed requests) map to 400; internal
    /// invariant violations and encoder failures map to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Decode(_) | Self::Dimension(_) | Self::Transition(_) | Self::InvalidRequest(_) => {
                400
            }
            Self::Cancelled => 503,
            Self::Quantize(_) | Self::Encode(_) | Self::Other(_) => 500,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
