use crate::error::EnhanceError;
use image::{Rgb, RgbImage};
use imageproc::stats::histogram;

/// Output range of the "low contrast" mode
pub const LOW_CONTRAST_RANGE: (u8, u8) = (70, 150);

/// Squeeze all channels into `LOW_CONTRAST_RANGE` with a single min-max
/// mapping over every channel
pub fn apply(image: RgbImage) -> Result<RgbImage, EnhanceError> {
    let (lo, hi) = LOW_CONTRAST_RANGE;
    Ok(normalize_into(&image, lo, hi))
}

/// Linear min-max mapping of all channels into `[lo, hi]`, rounded
pub fn normalize_into(image: &RgbImage, lo: u8, hi: u8) -> RgbImage {
    let (min_val, max_val) = find_min_max(image);

    // Avoid division by zero
    if max_val <= min_val {
        return image.clone();
    }

    let scale = (hi as f32 - lo as f32) / (max_val - min_val) as f32;
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let Rgb(channels) = *pixel;
        *pixel = Rgb(channels.map(|v| {
            let mapped = (v - min_val) as f32 * scale + lo as f32;
            mapped.round().clamp(0.0, 255.0) as u8
        }));
    }
    out
}

/// Darkest and brightest value over all channels
fn find_min_max(img: &RgbImage) -> (u8, u8) {
    let channels = histogram(img).channels;

    let min = channels
        .iter()
        .filter_map(|bins| bins.iter().position(|&c| c > 0))
        .min()
        .unwrap_or(0);
    let max = channels
        .iter()
        .filter_map(|bins| bins.iter().rposition(|&c| c > 0))
        .max()
        .unwrap_or(0);

    (min as u8, max as u8)
}
