use tracing::debug;

use crate::{
    error::Result,
    imaging::{Canvas, Placement, SourceImage, TargetSpec},
    treatments::{Treatment, TreatmentParams},
};

/// Sharp contained photo over a stretched, blurred copy of itself
pub struct BlurredBackdropTreatment;

impl BlurredBackdropTreatment {
    pub fn new() -> Self {
        Self
    }

    /// Stretch the source to the full canvas and blur it
    fn backdrop(&self, source: &SourceImage, target: &TargetSpec, params: &TreatmentParams) -> Canvas {
        let mut backdrop = Canvas::stretched(
            source.pixels(),
            target.width,
            target.height,
            params.filter_type(),
        );
        backdrop.blur(params.blur_sigma);
        backdrop
    }
}

impl Default for BlurredBackdropTreatment {
    fn default() -> Self {
        Self::new()
    }
}

impl Treatment for BlurredBackdropTreatment {
    fn name(&self) -> &str {
        "blurred-backdrop"
    }

    fn description(&self) -> &str {
        "Undistorted photo centred over a stretched, blurred copy filling the canvas"
    }

    fn render(&self, source: &SourceImage, target: &TargetSpec, params: &TreatmentParams) -> Result<Canvas> {
        let canvas_size = (target.width, target.height);
        let placement = Placement::contain((source.width(), source.height()), canvas_size);

        debug!(
            "backdrop {}: sigma {:.1}, sharp {}x{} at ({}, {})",
            target.name, params.blur_sigma, placement.width, placement.height, placement.x, placement.y
        );

        // Background underneath keeps transparent sources opaque in the JPEG
        let mut canvas = Canvas::new_filled(target.width, target.height, params.background);
        canvas.draw_canvas(&self.backdrop(source, target, params));
        canvas.draw_scaled(source.pixels(), placement, params.filter_type());

        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::types::ResampleFilter;
    use image::imageops::{self, FilterType};
    use image::{ImageBuffer, Rgba, RgbaImage};

    /// Vertical stripes: sharp edges that a blur visibly smears
    fn striped(width: u32, height: u32) -> RgbaImage {
        ImageBuffer::from_fn(width, height, |x, _| {
            if (x / 4) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    fn params() -> TreatmentParams {
        TreatmentParams {
            filter: ResampleFilter::Triangle,
            blur_sigma: 8.0,
            ..TreatmentParams::default()
        }
    }

    #[test]
    fn test_centre_is_sharp_copy_of_source() {
        let pixels = striped(40, 80);
        let source = SourceImage::from_pixels("stripes.png", pixels.clone());
        let target = TargetSpec::blurred_backdrop("erp", 50, 50);

        let canvas = BlurredBackdropTreatment::new()
            .render(&source, &target, &params())
            .unwrap();

        // 40x80 onto 50x50: contained at 25x50, 12px margins
        let expected = imageops::resize(&pixels, 25, 50, FilterType::Triangle);
        for y in 0..50 {
            for x in 0..25 {
                assert_eq!(canvas.get_pixel(12 + x, y), expected.get_pixel(x, y).0);
            }
        }
    }

    #[test]
    fn test_margins_are_blurred_backdrop() {
        let pixels = striped(40, 80);
        let source = SourceImage::from_pixels("stripes.png", pixels);
        let target = TargetSpec::blurred_backdrop("erp", 50, 50);
        let params = params();

        let canvas = BlurredBackdropTreatment::new()
            .render(&source, &target, &params)
            .unwrap();

        let backdrop = BlurredBackdropTreatment::new().backdrop(&source, &target, &params);
        for y in 0..50 {
            for x in 0..12 {
                let got = canvas.get_pixel(x, y);
                let want = backdrop.get_pixel(x, y);
                for channel in 0..3 {
                    assert!(
                        (got[channel] as i16 - want[channel] as i16).abs() <= 3,
                        "margin ({}, {}) differs from backdrop: {:?} vs {:?}",
                        x,
                        y,
                        got,
                        want
                    );
                }
            }
        }

        // A blurred stripe pattern mixes red and blue
        let [r, _, b, _] = canvas.get_pixel(5, 25);
        assert!(r > 0 && b > 0, "margin pixel not blurred: {:?}", (r, b));
    }

    #[test]
    fn test_output_matches_target_size() {
        let source = SourceImage::from_pixels("wide.png", striped(120, 30));
        let target = TargetSpec::blurred_backdrop("erp", 64, 48);

        let canvas = BlurredBackdropTreatment::new()
            .render(&source, &target, &params())
            .unwrap();

        assert_eq!(canvas.size(), (64, 48));
    }
}
