use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::effects::transitions::TransitionKind;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{GifError, GifResult};

/// Resampling filter used when an input has to be scaled into the shared frame geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    /// Bilinear.
    Triangle,
    CatmullRom,
    #[default]
    Lanczos3,
}

impl ResizeFilter {
    pub(crate) fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Self::Triangle => image::imageops::FilterType::Triangle,
            Self::CatmullRom => image::imageops::FilterType::CatmullRom,
            Self::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Guide line drawn on interior frames at the transition seam.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DividerStyle {
    pub color: Rgba8,
    /// Line thickness in pixels.
    pub width: u32,
}

impl Default for DividerStyle {
    fn default() -> Self {
        Self {
            color: [0, 255, 0, 255],
            width: 2,
        }
    }
}

/// Process-wide policy constants. Immutable once a pipeline starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub slide_frames: u32,
    pub rotate_frames: u32,
    pub total_duration_ms: u32,
    pub max_dimension: u32,
    pub max_colors: u16,
    pub background: Rgba8,
    pub resize_filter: ResizeFilter,
    pub rotate_sweep_degrees: f64,
    pub alpha_threshold: u8,
    pub sample_stride: u32,
    pub divider: Option<DividerStyle>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            slide_frames: 20,
            rotate_frames: 20,
            total_duration_ms: 2000,
            max_dimension: 1024,
            max_colors: 256,
            background: [255, 255, 255, 255],
            resize_filter: ResizeFilter::default(),
            rotate_sweep_degrees: 180.0,
            alpha_threshold: 128,
            sample_stride: 1,
            divider: None,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> GifResult<()> {
        if self.slide_frames < 2 || self.rotate_frames < 2 {
            return Err(GifError::invalid_request(
                "slide_frames and rotate_frames must be >= 2",
            ));
        }
        if self.total_duration_ms == 0 {
            return Err(GifError::invalid_request(
                "total_duration_ms must be non-zero",
            ));
        }
        if self.max_dimension == 0 || self.max_dimension > u32::from(u16::MAX) {
            return Err(GifError::invalid_request(format!(
                "max_dimension must be in 1..={}",
                u16::MAX
            )));
        }
        if !(2..=256).contains(&self.max_colors) {
            return Err(GifError::invalid_request("max_colors must be in 2..=256"));
        }
        if !self.rotate_sweep_degrees.is_finite() || self.rotate_sweep_degrees == 0.0 {
            return Err(GifError::invalid_request(
                "rotate_sweep_degrees must be finite and non-zero",
            ));
        }
        if self.sample_stride == 0 {
            return Err(GifError::invalid_request("sample_stride must be >= 1"));
        }
        if let Some(d) = self.divider
            && d.width == 0
        {
            return Err(GifError::invalid_request("divider.width must be >= 1"));
        }
        Ok(())
    }

    /// Fixed frame count for a transition kind.
    pub fn frame_count(&self, kind: TransitionKind) -> usize {
        match kind {
            TransitionKind::Slide => self.slide_frames as usize,
            TransitionKind::Rotate => self.rotate_frames as usize,
        }
    }

    /// Per-frame delay in hundredths of a second: total duration / N, never below 1.
    pub fn frame_delay_cs(&self, kind: TransitionKind) -> u16 {
        let total_cs = self.total_duration_ms / 10;
        let n = self.frame_count(kind).max(1) as u32;
        (total_cs / n).clamp(1, u32::from(u16::MAX)) as u16
    }

    pub fn from_json_str(s: &str) -> GifResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| GifError::invalid_request(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> GifResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
