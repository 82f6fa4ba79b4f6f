//! Text rasterization contract and pixel buffers.
//!
//! The host turns a string into a brightness grid; the text generator only
//! ever sees a [`PixelBuffer`].

use crate::error::MorphError;

/// Largest canvas a rasterizer is asked to fill (4096 x 4096).
pub const MAX_CANVAS_PIXELS: usize = 4096 * 4096;

/// `width * height`, rejecting canvases that overflow or exceed
/// [`MAX_CANVAS_PIXELS`].
pub fn pixel_count(width: u32, height: u32) -> Result<usize, MorphError> {
    match (width as usize).checked_mul(height as usize) {
        Some(n) if n <= MAX_CANVAS_PIXELS => Ok(n),
        _ => Err(MorphError::InvalidConfiguration(format!(
            "canvas {width}x{height} exceeds {MAX_CANVAS_PIXELS} pixels"
        ))),
    }
}

/// Row-major brightness grid, values in 0..1.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

impl PixelBuffer {
    /// All-black buffer.
    pub fn new(width: u32, height: u32) -> Result<Self, MorphError> {
        Ok(Self {
            width,
            height,
            data: vec![0.0; pixel_count(width, height)?],
        })
    }

    /// Wrap brightness values, checking the length against the dimensions.
    pub fn from_brightness(width: u32, height: u32, data: Vec<f32>) -> Result<Self, MorphError> {
        let expected = pixel_count(width, height)?;
        if data.len() != expected {
            return Err(MorphError::RasterSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Single-channel 8-bit coverage.
    pub fn from_luma8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, MorphError> {
        Self::from_brightness(
            width,
            height,
            bytes.iter().map(|b| *b as f32 / 255.0).collect(),
        )
    }

    /// RGBA8 (canvas `ImageData` layout). Brightness is luminance scaled by alpha.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, MorphError> {
        let expected = pixel_count(width, height)?;
        if bytes.len() != expected * 4 {
            return Err(MorphError::RasterSize {
                expected,
                actual: bytes.len() / 4,
            });
        }
        let data = bytes
            .chunks_exact(4)
            .map(|px| {
                let luma = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
                (luma / 255.0) * (px[3] as f32 / 255.0)
            })
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Max-blend coverage into a pixel; out-of-bounds writes are dropped.
    #[inline]
    pub fn blend_max(&mut self, x: i32, y: i32, value: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        let v = value.clamp(0.0, 1.0);
        if v > self.data[idx] {
            self.data[idx] = v;
        }
    }
}

/// Host-side text rasterizer.
pub trait TextRasterAdapter {
    fn rasterize(
        &self,
        text: &str,
        font_size_px: u32,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<PixelBuffer, MorphError>;
}

impl<F> TextRasterAdapter for F
where
    F: Fn(&str, u32, u32, u32) -> Result<PixelBuffer, MorphError>,
{
    fn rasterize(
        &self,
        text: &str,
        font_size_px: u32,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<PixelBuffer, MorphError> {
        self(text, font_size_px, canvas_width, canvas_height)
    }
}

#[cfg(feature = "glyph-raster")]
mod glyph {
    use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};

    use super::{PixelBuffer, TextRasterAdapter};
    use crate::error::MorphError;

    /// Native rasterizer over TTF/OTF bytes. Lays the text out on one line,
    /// centered on the canvas, and writes glyph coverage as brightness.
    pub struct GlyphRasterizer {
        font: FontVec,
    }

    impl std::fmt::Debug for GlyphRasterizer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("GlyphRasterizer").finish_non_exhaustive()
        }
    }

    impl GlyphRasterizer {
        pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, MorphError> {
            let font = FontVec::try_from_vec(bytes)
                .map_err(|e| MorphError::Raster(format!("decode font: {e}")))?;
            Ok(Self { font })
        }
    }

    impl TextRasterAdapter for GlyphRasterizer {
        fn rasterize(
            &self,
            text: &str,
            font_size_px: u32,
            canvas_width: u32,
            canvas_height: u32,
        ) -> Result<PixelBuffer, MorphError> {
            let mut buf = PixelBuffer::new(canvas_width, canvas_height)?;
            let scale = PxScale::from(font_size_px.max(1) as f32);
            let scaled = self.font.as_scaled(scale);

            // Single-line layout with kerning, caret at baseline y = 0.
            let mut caret = 0.0f32;
            let mut prev = None;
            let mut glyphs = Vec::with_capacity(text.len());
            for ch in text.chars() {
                if ch.is_control() {
                    continue;
                }
                let id = scaled.glyph_id(ch);
                if let Some(p) = prev {
                    caret += scaled.kern(p, id);
                }
                glyphs.push(id.with_scale_and_position(scale, point(caret, 0.0)));
                caret += scaled.h_advance(id);
                prev = Some(id);
            }

            let line_height = scaled.ascent() - scaled.descent();
            let left = (canvas_width as f32 - caret) * 0.5;
            let baseline = (canvas_height as f32 - line_height) * 0.5 + scaled.ascent();

            for mut glyph in glyphs {
                glyph.position.x += left;
                glyph.position.y = baseline;
                if let Some(outlined) = self.font.outline_glyph(glyph) {
                    let bounds = outlined.px_bounds();
                    let (ox, oy) = (bounds.min.x as i32, bounds.min.y as i32);
                    outlined.draw(|x, y, coverage| {
                        buf.blend_max(ox + x as i32, oy + y as i32, coverage);
                    });
                }
            }
            Ok(buf)
        }
    }
}

#[cfg(feature = "glyph-raster")]
pub use glyph::GlyphRasterizer;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_brightness_uses_alpha() {
        let bytes = [255, 255, 255, 255, 255, 255, 255, 0, 0, 0, 0, 255];
        let buf = PixelBuffer::from_rgba8(3, 1, &bytes).unwrap();
        assert!((buf.get(0, 0) - 1.0).abs() < 1e-3);
        assert_eq!(buf.get(1, 0), 0.0);
        assert_eq!(buf.get(2, 0), 0.0);
    }

    #[test]
    fn size_mismatch_is_reported() {
        let err = PixelBuffer::from_luma8(4, 4, &[0u8; 10]).unwrap_err();
        assert!(matches!(
            err,
            MorphError::RasterSize {
                expected: 16,
                actual: 10
            }
        ));
        assert!(PixelBuffer::from_rgba8(2, 2, &[0u8; 15]).is_err());
    }

    #[test]
    fn out_of_bounds_access_is_dark() {
        let mut buf = PixelBuffer::new(2, 2).unwrap();
        buf.blend_max(-1, 0, 1.0);
        buf.blend_max(5, 5, 1.0);
        buf.blend_max(1, 1, 0.7);
        buf.blend_max(1, 1, 0.2);
        assert_eq!(buf.get(9, 9), 0.0);
        assert!((buf.get(1, 1) - 0.7).abs() < 1e-6);
        assert_eq!(buf.data.iter().filter(|v| **v > 0.0).count(), 1);
    }

    #[test]
    fn closures_are_rasterizers() {
        let r = |_: &str, _: u32, w: u32, h: u32| -> Result<PixelBuffer, MorphError> {
            PixelBuffer::new(w, h)
        };
        let buf = r.rasterize("x", 12, 8, 4).unwrap();
        assert_eq!(buf.data.len(), 32);
    }

    #[test]
    fn oversized_canvas_is_refused() {
        assert!(matches!(
            PixelBuffer::new(1_000_000, 1_000_000),
            Err(MorphError::InvalidConfiguration(_))
        ));
        assert!(PixelBuffer::new(u32::MAX, u32::MAX).is_err());
        assert!(PixelBuffer::from_brightness(5000, 5000, Vec::new()).is_err());
        assert_eq!(pixel_count(4096, 4096).unwrap(), MAX_CANVAS_PIXELS);
        assert!(pixel_count(4097, 4096).is_err());
    }

    #[cfg(feature = "glyph-raster")]
    #[test]
    fn glyph_rasterizer_rejects_garbage_font() {
        assert!(matches!(
            GlyphRasterizer::from_bytes(vec![0u8; 32]),
            Err(MorphError::Raster(_))
        ));
    }
}
