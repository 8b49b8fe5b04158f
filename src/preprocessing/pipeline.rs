use crate::color::YCrCbPlanes;
use crate::engine::{AdaptiveEqualization, Enhancer, GlobalEqualization};
use crate::enhancement::clahe::{ClaheConfig, ClipLimit};
use crate::error::EnhanceError;
use crate::histogram::HistogramReport;
use image::{DynamicImage, GrayImage, RgbImage};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use super::steps;

/// Degradation applied before enhancement, to preview how each method copes
/// with poor captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Use the image as loaded
    #[default]
    Original,
    /// Underexposed: every channel scaled by 0.9
    Dark,
    /// Flattened: all channels squeezed into 70..=150
    LowContrast,
}

impl Mode {
    /// Get the mode name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Dark => "dark",
            Self::LowContrast => "low_contrast",
        }
    }
}

impl FromStr for Mode {
    type Err = EnhanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "original" => Ok(Self::Original),
            "dark" => Ok(Self::Dark),
            "low_contrast" => Ok(Self::LowContrast),
            _ => Err(EnhanceError::invalid_config(
                "mode",
                s,
                "expected original, dark or low_contrast",
            )),
        }
    }
}

/// Timing information for a single pipeline step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// The four image panels of a comparison run
#[derive(Debug, Clone)]
pub struct EnhancedImages {
    pub gray: GrayImage,
    pub gray_he: GrayImage,
    pub color: RgbImage,
    pub color_clahe: RgbImage,
}

impl EnhancedImages {
    /// Write every panel as PNG into `dir`, returning the written paths
    pub fn save(&self, dir: &Path) -> Result<Vec<PathBuf>, EnhanceError> {
        let targets = [
            ("gray.png", DynamicImage::ImageLuma8(self.gray.clone())),
            ("gray_he.png", DynamicImage::ImageLuma8(self.gray_he.clone())),
            ("color.png", DynamicImage::ImageRgb8(self.color.clone())),
            ("color_clahe.png", DynamicImage::ImageRgb8(self.color_clahe.clone())),
        ];

        let mut written = Vec::with_capacity(targets.len());
        for (name, image) in targets {
            let path = dir.join(name);
            image.save(&path)?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Result of a comparison run including timing stats
#[derive(Debug, Clone, Serialize)]
pub struct EnhancementReport {
    /// Output images (not serialized)
    #[serde(skip)]
    pub images: EnhancedImages,
    pub mode: String,
    pub width: u32,
    pub height: u32,
    pub tile_rows: u32,
    pub tile_cols: u32,
    pub clip_limit: String,
    /// Total processing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
    /// Grayscale, HE, luma, and CLAHE luma histograms in that order
    pub histograms: Vec<HistogramReport>,
}

impl EnhancementReport {
    pub fn write_json(&self, path: &Path) -> Result<(), EnhanceError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }
}

/// Degrade, then enhance one image with both HE (grayscale) and CLAHE (luma
/// of the color image)
pub struct Pipeline {
    mode: Mode,
    global: GlobalEqualization,
    adaptive: AdaptiveEqualization,
}

impl Pipeline {
    pub fn new(mode: Mode, clahe: ClaheConfig) -> Self {
        Self {
            mode,
            global: GlobalEqualization,
            adaptive: AdaptiveEqualization::new(clahe),
        }
    }

    pub fn process(&self, image: DynamicImage) -> Result<EnhancementReport, EnhanceError> {
        let clahe = self.adaptive.config;
        clahe.validate()?;

        let start = Instant::now();
        let mut timings = Vec::new();

        let color = image.to_rgb8();
        let color = match self.mode {
            Mode::Original => color,
            Mode::Dark => self.run_step("darken", &mut timings, || steps::darken::apply(color))?,
            Mode::LowContrast => {
                self.run_step("normalize", &mut timings, || steps::normalize::apply(color))?
            }
        };

        let planes = self.run_step("split", &mut timings, || YCrCbPlanes::split(&color))?;
        let gray = planes.luma.clone();

        let gray_he = self.run_step(self.global.name(), &mut timings, || {
            self.global.enhance(&gray)
        })?;
        let luma_clahe = self.run_step(self.adaptive.name(), &mut timings, || {
            self.adaptive.enhance(&planes.luma)
        })?;
        let color_clahe = self.run_step("merge", &mut timings, || planes.merge_with(&luma_clahe))?;

        let histograms = self.run_step("histograms", &mut timings, || {
            [
                ("grayscale", &gray),
                ("equalized", &gray_he),
                ("luma", &planes.luma),
                ("luma_clahe", &luma_clahe),
            ]
            .into_iter()
            .map(|(label, buffer)| HistogramReport::from_buffer(label, buffer))
            .collect::<Result<Vec<_>, _>>()
        })?;

        let (width, height) = gray.dimensions();
        Ok(EnhancementReport {
            images: EnhancedImages {
                gray: gray.into_gray_image(),
                gray_he: gray_he.into_gray_image(),
                color,
                color_clahe,
            },
            mode: self.mode.as_str().to_string(),
            width,
            height,
            tile_rows: clahe.tile_rows,
            tile_cols: clahe.tile_cols,
            clip_limit: describe_clip_limit(&clahe.clip_limit),
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: timings,
            histograms,
        })
    }

    fn run_step<T, F>(
        &self,
        name: &str,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> Result<T, EnhanceError>
    where
        F: FnOnce() -> Result<T, EnhanceError>,
    {
        let step_start = Instant::now();
        let result = step_fn()?;
        let time_ms = step_start.elapsed().as_millis() as u64;
        tracing::debug!("Step {} finished in {}ms", name, time_ms);
        timings.push(StepTiming {
            name: name.to_string(),
            time_ms,
        });
        Ok(result)
    }
}

fn describe_clip_limit(limit: &ClipLimit) -> String {
    match limit {
        ClipLimit::Absolute(count) => format!("{} per bin", count),
        ClipLimit::Relative(factor) => format!("{}x mean bin", factor),
    }
}
