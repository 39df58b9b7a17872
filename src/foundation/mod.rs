//! Core types, configuration, error taxonomy and pixel math.

pub mod config;
pub mod core;
pub mod error;
pub(crate) mod math;
