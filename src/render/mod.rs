//! Transition frame synthesis.

pub mod frames;
