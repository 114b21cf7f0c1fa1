use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ColorType, ImageBuffer, Rgba, RgbaImage, RgbImage};

use super::placement::Placement;

/// An RGBA drawing surface a treatment paints into
///
/// Thin wrapper around an image buffer with the handful of drawing
/// primitives the treatments need: fill, scaled draw with clipping, blur,
/// and JPEG export.
#[derive(Clone, Debug)]
pub struct Canvas {
    buffer: RgbaImage,
}

impl Canvas {
    /// Create a canvas filled with an opaque colour
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let buffer = ImageBuffer::from_pixel(width, height, Rgba([color[0], color[1], color[2], 255]));
        Self { buffer }
    }

    /// Create a canvas holding `source` stretched to exactly `width x height`
    pub fn stretched(source: &RgbaImage, width: u32, height: u32, filter: FilterType) -> Self {
        Self {
            buffer: imageops::resize(source, width, height, filter),
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Get a pixel at the given coordinates
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.buffer.get_pixel(x, y).0
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Draw `source` scaled to `placement`, alpha-blended over the canvas
    ///
    /// The whole source is resampled to the placement size and overlaid at
    /// its signed offset, so overflow is cropped exactly where the placement
    /// says.
    pub fn draw_scaled(&mut self, source: &RgbaImage, placement: Placement, filter: FilterType) {
        if placement.visible(self.size()).is_none() {
            return;
        }

        let scaled = imageops::resize(source, placement.width, placement.height, filter);
        imageops::overlay(&mut self.buffer, &scaled, placement.x, placement.y);
    }

    /// Paint another canvas over this one, anchored at the top-left corner
    pub fn draw_canvas(&mut self, layer: &Canvas) {
        imageops::overlay(&mut self.buffer, &layer.buffer, 0, 0);
    }

    /// Gaussian blur with the given standard deviation in pixels
    pub fn blur(&mut self, sigma: f32) {
        if sigma > 0.0 {
            self.buffer = imageops::blur(&self.buffer, sigma);
        }
    }

    /// Flatten to RGB, dropping the alpha channel
    pub fn to_rgb(&self) -> RgbImage {
        self.buffer.convert()
    }

    /// Encode as baseline JPEG at `quality` (1-100)
    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, image::ImageError> {
        let rgb = self.to_rgb();
        let mut bytes = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
        encoder.encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        ImageBuffer::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn test_draw_scaled_clips_overflow() {
        let mut canvas = Canvas::new_filled(10, 10, [255, 255, 255]);
        let source = solid(4, 2, [200, 0, 0, 255]);

        canvas.draw_scaled(
            &source,
            Placement { x: -5, y: 0, width: 20, height: 10 },
            FilterType::Nearest,
        );

        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(canvas.get_pixel(x, y), [200, 0, 0, 255]);
            }
        }
    }

    #[test]
    fn test_draw_scaled_leaves_margins() {
        let mut canvas = Canvas::new_filled(10, 10, [255, 255, 255]);
        let source = solid(2, 2, [0, 0, 0, 255]);

        canvas.draw_scaled(
            &source,
            Placement { x: 3, y: 0, width: 4, height: 10 },
            FilterType::Nearest,
        );

        assert_eq!(canvas.get_pixel(0, 5), [255, 255, 255, 255]);
        assert_eq!(canvas.get_pixel(5, 5), [0, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(9, 5), [255, 255, 255, 255]);
    }

    #[test]
    fn test_fractional_cover_crops_like_a_full_resize() {
        // 5x3 onto 10x10 covers at 17x10, offset -3: columns 0-2 are cut off
        let source = ImageBuffer::from_fn(5, 3, |x, _| Rgba([(x * 50) as u8, 0, 0, 255]));
        let placement = Placement::cover((5, 3), (10, 10));
        assert_eq!(placement, Placement { x: -3, y: 0, width: 17, height: 10 });

        let mut canvas = Canvas::new_filled(10, 10, [255, 255, 255]);
        canvas.draw_scaled(&source, placement, FilterType::Nearest);

        let expected = imageops::resize(&source, 17, 10, FilterType::Nearest);
        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(
                    canvas.get_pixel(x, y),
                    expected.get_pixel(x + 3, y).0,
                    "pixel ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_semi_transparent_layer_blends() {
        let mut canvas = Canvas::new_filled(2, 2, [0, 0, 0]);
        let layer = Canvas {
            buffer: solid(2, 2, [255, 255, 255, 128]),
        };

        canvas.draw_canvas(&layer);

        let [r, g, b, a] = canvas.get_pixel(1, 1);
        assert!((120..=136).contains(&r), "blended red {}", r);
        assert_eq!((r, g), (g, b));
        assert_eq!(a, 255);
    }

    #[test]
    fn test_transparent_source_shows_background() {
        let mut canvas = Canvas::new_filled(4, 4, [255, 255, 255]);
        let source = solid(4, 4, [0, 0, 0, 0]);

        canvas.draw_scaled(&source, Placement::stretch((4, 4)), FilterType::Nearest);

        assert_eq!(canvas.get_pixel(2, 2), [255, 255, 255, 255]);
    }

    #[test]
    fn test_encode_jpeg_has_soi_marker() {
        let canvas = Canvas::new_filled(16, 8, [10, 20, 30]);
        let bytes = canvas.encode_jpeg(90).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }
}
