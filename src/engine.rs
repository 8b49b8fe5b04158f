use crate::buffer::PixelBuffer;
use crate::enhancement::clahe::{self, ClaheConfig, ClipLimit};
use crate::enhancement::global;
use crate::error::EnhanceError;

/// Trait that every enhancement strategy implements
pub trait Enhancer: Send + Sync {
    /// Returns the strategy identifier (e.g., "he", "clahe")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the strategy
    fn description(&self) -> &'static str;

    /// Produce an enhanced copy of the buffer
    fn enhance(&self, buffer: &PixelBuffer) -> Result<PixelBuffer, EnhanceError>;
}

/// Global histogram equalization
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalEqualization;

impl Enhancer for GlobalEqualization {
    fn name(&self) -> &'static str {
        "he"
    }

    fn description(&self) -> &'static str {
        "Global histogram equalization"
    }

    fn enhance(&self, buffer: &PixelBuffer) -> Result<PixelBuffer, EnhanceError> {
        enhance_global(buffer)
    }
}

/// Contrast limited adaptive histogram equalization
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveEqualization {
    pub config: ClaheConfig,
}

impl AdaptiveEqualization {
    pub fn new(config: ClaheConfig) -> Self {
        Self { config }
    }
}

impl Enhancer for AdaptiveEqualization {
    fn name(&self) -> &'static str {
        "clahe"
    }

    fn description(&self) -> &'static str {
        "Contrast limited adaptive histogram equalization"
    }

    fn enhance(&self, buffer: &PixelBuffer) -> Result<PixelBuffer, EnhanceError> {
        enhance_adaptive(
            buffer,
            self.config.tile_rows,
            self.config.tile_cols,
            self.config.clip_limit,
        )
    }
}

pub fn enhance_global(buffer: &PixelBuffer) -> Result<PixelBuffer, EnhanceError> {
    global::equalize(buffer)
}

pub fn enhance_adaptive(
    buffer: &PixelBuffer,
    tile_rows: u32,
    tile_cols: u32,
    clip_limit: ClipLimit,
) -> Result<PixelBuffer, EnhanceError> {
    let grid = clahe::build_tiles(buffer, tile_rows, tile_cols, clip_limit)?;
    clahe::apply(buffer, &grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured() -> PixelBuffer {
        PixelBuffer::from_fn(40, 30, |x, y| (60 + (x * 5 + y * 3) % 90) as u8).unwrap()
    }

    #[test]
    fn test_enhance_global_output_in_range_and_sized() {
        let buffer = textured();
        let result = enhance_global(&buffer).unwrap();
        assert_eq!(result.dimensions(), buffer.dimensions());
        assert_eq!(result.as_raw().len(), buffer.as_raw().len());
    }

    #[test]
    fn test_strategies_match_entry_points() {
        let buffer = textured();
        let config = ClaheConfig::new(3, 4, ClipLimit::Relative(2.0));

        let strategies: Vec<Box<dyn Enhancer>> = vec![
            Box::new(GlobalEqualization),
            Box::new(AdaptiveEqualization::new(config)),
        ];
        let names: Vec<&str> = strategies.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["he", "clahe"]);

        assert_eq!(
            strategies[0].enhance(&buffer).unwrap(),
            enhance_global(&buffer).unwrap()
        );
        assert_eq!(
            strategies[1].enhance(&buffer).unwrap(),
            enhance_adaptive(&buffer, 3, 4, ClipLimit::Relative(2.0)).unwrap()
        );
    }

    #[test]
    fn test_calls_are_pure() {
        let buffer = textured();
        let first = enhance_adaptive(&buffer, 2, 2, ClipLimit::Absolute(20)).unwrap();
        let second = enhance_adaptive(&buffer, 2, 2, ClipLimit::Absolute(20)).unwrap();
        assert_eq!(first, second);
        assert_eq!(buffer, textured());
    }

    #[test]
    fn test_adaptive_rejects_bad_configuration() {
        let buffer = textured();
        let err = enhance_adaptive(&buffer, 8, 8, ClipLimit::Relative(0.0)).unwrap_err();
        assert!(err.to_string().contains("clip_limit"));
    }
}
