//! Input decoding and the image normalizer.

pub mod decode;
pub mod normalize;
