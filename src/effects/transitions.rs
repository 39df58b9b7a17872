use serde::{Deserialize, Serialize};

use crate::foundation::error::{GifError, GifResult};

/// Closed set of transition styles; each selects one pure frame-generation function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Horizontal push: A slides out to the left while B enters from the right.
    #[default]
    Slide,
    /// A rotates and fades out while B rotates into place and fades in.
    Rotate,
}

impl TransitionKind {
    /// Parse a `transition_type` form value. Unknown values fall back to [`TransitionKind::Slide`].
    pub fn from_form_value(raw: &str) -> Self {
        match Self::parse_strict(raw) {
            Ok(kind) => kind,
            Err(_) => {
                tracing::warn!(
                    transition_type = raw,
                    "unrecognized transition type, using slide"
                );
                Self::Slide
            }
        }
    }

    /// Parse a transition name, failing on anything unrecognized.
    pub fn parse_strict(raw: &str) -> GifResult<Self> {
        let kind = raw.trim().to_ascii_lowercase();
        if kind.is_empty() {
            return Err(GifError::transition("transition kind must be non-empty"));
        }
        match kind.as_str() {
            "default" | "slide" => Ok(Self::Slide),
            "rotate" | "rotating" => Ok(Self::Rotate),
            _ => Err(GifError::transition(format!(
                "unknown transition kind '{kind}'"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slide => "slide",
            Self::Rotate => "rotate",
        }
    }
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
