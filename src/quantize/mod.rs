//! Shared-palette colour quantization.

/// Nearest-colour mapping of frames onto a palette.
pub mod indexer;
/// Histogram and median-cut palette construction.
pub mod palette;
