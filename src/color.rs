//! BT.601 full-range Y'CrCb split and merge
//!
//! Enhancement runs on the luma plane only; chroma is carried through
//! untouched and recombined afterwards.

use crate::buffer::PixelBuffer;
use crate::error::EnhanceError;
use image::{Rgb, RgbImage};

const KR: f32 = 0.299;
const KG: f32 = 0.587;
const KB: f32 = 0.114;
const CHROMA_OFFSET: f32 = 128.0;

#[inline]
fn saturate(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    saturate(KR * r as f32 + KG * g as f32 + KB * b as f32)
}

/// Separated luma and chroma planes of an RGB image
#[derive(Debug, Clone)]
pub struct YCrCbPlanes {
    pub luma: PixelBuffer,
    cr: Vec<u8>,
    cb: Vec<u8>,
}

impl YCrCbPlanes {
    pub fn split(image: &RgbImage) -> Result<Self, EnhanceError> {
        let len = image.width() as usize * image.height() as usize;
        let mut y_plane = Vec::with_capacity(len);
        let mut cr = Vec::with_capacity(len);
        let mut cb = Vec::with_capacity(len);

        for p in image.pixels() {
            let (r, g, b) = (p[0] as f32, p[1] as f32, p[2] as f32);
            let y = KR * r + KG * g + KB * b;
            y_plane.push(luma(p[0], p[1], p[2]));
            cr.push(saturate((r - y) * 0.713 + CHROMA_OFFSET));
            cb.push(saturate((b - y) * 0.564 + CHROMA_OFFSET));
        }

        Ok(Self {
            luma: PixelBuffer::new(image.width(), image.height(), y_plane)?,
            cr,
            cb,
        })
    }

    /// Recombine `luma` (usually the enhanced plane) with the stored chroma.
    pub fn merge_with(&self, luma: &PixelBuffer) -> Result<RgbImage, EnhanceError> {
        if luma.dimensions() != self.luma.dimensions() {
            return Err(EnhanceError::InvalidInput(format!(
                "luma plane {}x{} does not match chroma planes {}x{}",
                luma.width(),
                luma.height(),
                self.luma.width(),
                self.luma.height()
            )));
        }

        let (width, height) = luma.dimensions();
        let mut out = RgbImage::new(width, height);
        for (i, (pixel, &y)) in out.pixels_mut().zip(luma.as_raw()).enumerate() {
            let y = y as f32;
            let cr = self.cr[i] as f32 - CHROMA_OFFSET;
            let cb = self.cb[i] as f32 - CHROMA_OFFSET;
            *pixel = Rgb([
                saturate(y + 1.403 * cr),
                saturate(y - 0.714 * cr - 0.344 * cb),
                saturate(y + 1.773 * cb),
            ]);
        }
        Ok(out)
    }

    pub fn merge(&self) -> Result<RgbImage, EnhanceError> {
        self.merge_with(&self.luma)
    }
}
