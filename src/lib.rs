//! morphgif turns two still images into a short looping GIF that transitions from one to the other.
//!
//! A request flows through four stages:
//!
//! - Normalize both images onto a shared canvas ([`assets::normalize`])
//! - Composite the transition frames, slide or rotate ([`render::frames`])
//! - Quantize every frame against one shared palette ([`quantize`])
//! - Encode a looping GIF89a stream ([`encode::gif89a`])
//!
//! [`Pipeline`] sequences the stages; [`generate_gif`] is the one-call entry point.
#![forbid(unsafe_code)]

/// Image decoding and canvas normalization.
pub mod assets;
/// Pixel blending and transition kinds.
pub mod effects;
/// GIF and MP4 output.
pub mod encode;
/// Shared types, configuration and errors.
pub mod foundation;
/// Stage orchestration.
pub mod pipeline;
/// Shared-palette construction and frame indexing.
pub mod quantize;
/// Transition frame rendering.
pub mod render;

pub use crate::effects::transitions::TransitionKind;
pub use crate::encode::gif89a::{GIF_CONTENT_TYPE, encode_gif};
pub use crate::foundation::config::{DividerStyle, PipelineConfig, ResizeFilter};
pub use crate::foundation::core::{
    Animation, Frame, IndexedFrame, LoopDirective, Palette, RasterImage, Rgb8, Rgba8,
};
pub use crate::foundation::error::{GifError, GifResult};
pub use crate::pipeline::{
    AnimationRequest, CancelToken, ErrorPayload, GeneratedGif, Pipeline, PipelineState,
    generate_gif,
};
