//! Output encoders.
//!
//! The GIF encoder is the pipeline's final stage; the MP4 writer is an optional export that
//! shells out to the system `ffmpeg`.

/// `ffmpeg`-based MP4 export.
pub mod ffmpeg;
/// GIF89a bitstream encoder.
pub mod gif89a;
