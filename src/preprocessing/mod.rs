//! Comparison pipeline around the enhancement core
//!
//! Applies an optional degradation, splits luma from chroma, and runs both
//! enhancement methods with per-step timings.

pub mod pipeline;
pub mod steps;

pub use pipeline::{EnhancedImages, EnhancementReport, Mode, Pipeline, StepTiming};
