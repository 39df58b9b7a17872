use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::assets::normalize::normalize_pair;
use crate::effects::transitions::TransitionKind;
use crate::encode::gif89a::{GIF_CONTENT_TYPE, encode_gif};
use crate::foundation::config::PipelineConfig;
use crate::foundation::core::{Animation, Frame};
use crate::foundation::error::{GifError, GifResult};
use crate::quantize::indexer::quantize_frames;
use crate::render::frames::render_transition;

/// One generation request: two encoded images (start, end) and a transition kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationRequest {
    pub start: Vec<u8>,
    pub end: Vec<u8>,
    pub transition: TransitionKind,
}

impl AnimationRequest {
    pub fn new(start: Vec<u8>, end: Vec<u8>, transition: TransitionKind) -> Self {
        Self {
            start,
            end,
            transition,
        }
    }

    /// Build a request from form-style inputs: exactly two `images` parts (order is start, end)
    /// and an optional `transition_type` value, which falls back to slide when unrecognized.
    pub fn from_form(images: Vec<Vec<u8>>, transition_type: Option<&str>) -> GifResult<Self> {
        let [start, end]: [Vec<u8>; 2] = images.try_into().map_err(|rest: Vec<Vec<u8>>| {
            GifError::invalid_request(format!("expected exactly two images, got {}", rest.len()))
        })?;
        let transition = transition_type
            .map(TransitionKind::from_form_value)
            .unwrap_or_default();
        Ok(Self::new(start, end, transition))
    }
}

/// Where a pipeline run currently is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    Normalized,
    Composited,
    Quantized,
    Encoded,
    Done,
    Failed(String),
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Normalized => "normalized",
            Self::Composited => "composited",
            Self::Quantized => "quantized",
            Self::Encoded => "encoded",
            Self::Done => "done",
            Self::Failed(_) => "failed",
        }
    }
}

/// Cooperative cancellation flag, checked between stages.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A complete encoded animation plus a few facts about it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedGif {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub frame_count: usize,
    pub delay_cs: u16,
    pub palette_len: usize,
    pub transition: TransitionKind,
}

impl GeneratedGif {
    pub fn content_type(&self) -> &'static str {
        GIF_CONTENT_TYPE
    }
}

/// Failure body returned to callers of the generation endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

impl ErrorPayload {
    pub fn from_error(err: &GifError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Runs Normalizer → Compositor → Quantizer → Encoder for one request.
///
/// A pipeline holds no state across requests beyond the borrowed configuration; each `run` owns
/// its intermediate buffers and drops them as soon as the next stage has consumed them.
#[derive(Debug)]
pub struct Pipeline<'a> {
    cfg: &'a PipelineConfig,
    cancel: Option<CancelToken>,
    state: PipelineState,
}

impl<'a> Pipeline<'a> {
    pub fn new(cfg: &'a PipelineConfig) -> Self {
        Self {
            cfg,
            cancel: None,
            state: PipelineState::Received,
        }
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Run every stage. Failures are terminal: the state becomes `Failed` and no bytes escape.
    pub fn run(&mut self, req: AnimationRequest) -> GifResult<GeneratedGif> {
        self.run_with_frames(req, |_| Ok(()))
    }

    /// Like [`Pipeline::run`], handing the composited full-colour frames to `on_frames` before
    /// they are quantized (e.g. for a video export). An error from `on_frames` fails the run.
    #[tracing::instrument(skip(self, req, on_frames), fields(transition = %req.transition))]
    pub fn run_with_frames<F>(
        &mut self,
        req: AnimationRequest,
        on_frames: F,
    ) -> GifResult<GeneratedGif>
    where
        F: FnOnce(&[Frame]) -> GifResult<()>,
    {
        self.state = PipelineState::Received;
        match self.run_stages(req, on_frames) {
            Ok(out) => {
                self.state = PipelineState::Done;
                tracing::info!(
                    bytes = out.bytes.len(),
                    frames = out.frame_count,
                    width = out.width,
                    height = out.height,
                    "generated gif"
                );
                Ok(out)
            }
            Err(err) => {
                tracing::warn!(after = self.state.name(), error = %err, "pipeline failed");
                self.state = PipelineState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    fn run_stages<F>(&mut self, req: AnimationRequest, on_frames: F) -> GifResult<GeneratedGif>
    where
        F: FnOnce(&[Frame]) -> GifResult<()>,
    {
        self.cfg.validate()?;
        let kind = req.transition;

        self.checkpoint()?;
        let t0 = Instant::now();
        let (a, b) = normalize_pair(&req.start, &req.end, self.cfg)?;
        drop(req);
        self.advance(PipelineState::Normalized, t0)?;

        let t0 = Instant::now();
        let n = self.cfg.frame_count(kind);
        let delay_cs = self.cfg.frame_delay_cs(kind);
        let frames: Vec<Frame> = render_transition(&a, &b, kind, n, self.cfg)?
            .into_iter()
            .map(|image| Frame::new(image, delay_cs))
            .collect();
        drop((a, b));
        self.advance(PipelineState::Composited, t0)?;
        on_frames(&frames)?;
        self.checkpoint()?;

        let t0 = Instant::now();
        let (palette, indexed) = quantize_frames(&frames, self.cfg)?;
        drop(frames);
        self.advance(PipelineState::Quantized, t0)?;

        let t0 = Instant::now();
        let palette_len = palette.len();
        let anim = Animation::new(palette, indexed);
        let bytes = encode_gif(&anim)?;
        self.state = PipelineState::Encoded;
        tracing::debug!(
            stage = self.state.name(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "stage complete"
        );

        Ok(GeneratedGif {
            bytes,
            width: anim.width,
            height: anim.height,
            frame_count: anim.frames.len(),
            delay_cs,
            palette_len,
            transition: kind,
        })
    }

    fn advance(&mut self, next: PipelineState, started: Instant) -> GifResult<()> {
        self.state = next;
        tracing::debug!(
            stage = self.state.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "stage complete"
        );
        self.checkpoint()
    }

    fn checkpoint(&self) -> GifResult<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(GifError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Generate a GIF for one request with a fresh pipeline.
pub fn generate_gif(req: AnimationRequest, cfg: &PipelineConfig) -> GifResult<GeneratedGif> {
    Pipeline::new(cfg).run(req)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
