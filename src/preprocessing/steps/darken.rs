use crate::error::EnhanceError;
use image::RgbImage;

/// Exposure factor applied by the "dark" mode
const DARKEN_FACTOR: f64 = 0.9;

/// Scale every channel by the darken factor, truncating toward zero
pub fn apply(image: RgbImage) -> Result<RgbImage, EnhanceError> {
    let mut image = image;
    for pixel in image.pixels_mut() {
        for c in pixel.0.iter_mut() {
            *c = (*c as f64 * DARKEN_FACTOR) as u8;
        }
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_darken_scales_and_truncates() {
        let img = RgbImage::from_pixel(3, 3, Rgb([255, 100, 9]));
        let result = apply(img).unwrap();
        // 229.5 -> 229, 90 -> 90, 8.1 -> 8
        assert_eq!(result.get_pixel(1, 1).0, [229, 90, 8]);
    }

    #[test]
    fn test_darken_keeps_black() {
        let img = RgbImage::new(4, 2);
        let result = apply(img).unwrap();
        assert!(result.pixels().all(|p| p.0 == [0, 0, 0]));
        assert_eq!(result.dimensions(), (4, 2));
    }
}
