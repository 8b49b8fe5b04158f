//! Degradation steps that simulate poor-quality captures before enhancement

pub mod darken;
pub mod normalize;
