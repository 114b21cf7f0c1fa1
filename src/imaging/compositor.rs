use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ImageError, Result};
use crate::imaging::types::{variant_name, RenderedVariant, SourceImage, TargetSpec, TreatmentKind};
use crate::imaging::{Canvas, Placement};
use crate::treatments::{self, TreatmentParams};

/// Parameters for rendering and encoding variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeParams {
    /// JPEG quality (1-100); 90 corresponds to 0.9 on a 0-1 scale
    pub jpeg_quality: u8,

    /// Largest canvas, in pixels, a target may request
    pub max_canvas_pixels: u64,

    /// Drawing parameters handed to the treatments
    pub treatment: TreatmentParams,
}

impl Default for CompositeParams {
    fn default() -> Self {
        Self {
            jpeg_quality: 90,
            max_canvas_pixels: 64_000_000,
            treatment: TreatmentParams::default(),
        }
    }
}

/// Renders one JPEG variant per target from a single source photo
///
/// Targets are independent pure functions of the same immutable source, so
/// they are rendered in parallel. The call is all-or-nothing: the first
/// failing target fails the whole batch and no variants are returned.
pub struct ImageCompositor {
    params: CompositeParams,
}

impl ImageCompositor {
    pub fn new(params: CompositeParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CompositeParams {
        &self.params
    }

    /// Decode `bytes` and render every target
    pub fn composite_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
        targets: &[TargetSpec],
    ) -> Result<Vec<RenderedVariant>> {
        let source = SourceImage::decode(file_name, bytes)?;
        self.composite(&source, targets)
    }

    /// Render every target, preserving input order
    pub fn composite(&self, source: &SourceImage, targets: &[TargetSpec]) -> Result<Vec<RenderedVariant>> {
        for target in targets {
            self.check_target(source, target)?;
        }

        info!(
            "Compositing {} ({}x{}) into {} variant(s)",
            source.file_name(),
            source.width(),
            source.height(),
            targets.len()
        );

        targets
            .par_iter()
            .map(|target| self.render_variant(source, target))
            .collect()
    }

    /// Paint a single target without encoding it
    pub fn render(&self, source: &SourceImage, target: &TargetSpec) -> Result<Canvas> {
        self.check_target(source, target)?;
        treatments::for_kind(target.treatment).render(source, target, &self.params.treatment)
    }

    /// Paint and JPEG-encode a single target
    pub fn render_variant(&self, source: &SourceImage, target: &TargetSpec) -> Result<RenderedVariant> {
        let canvas = self.render(source, target)?;
        let name = variant_name(source.file_name(), target.width, target.height);

        let encoded_bytes = canvas
            .encode_jpeg(self.params.jpeg_quality)
            .map_err(|e| ImageError::Encode {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        debug!(
            "Encoded {} [{}, {}]: {} bytes",
            name,
            target.name,
            target.treatment.as_str(),
            encoded_bytes.len()
        );

        Ok(RenderedVariant {
            name,
            target: target.name.clone(),
            byte_size: encoded_bytes.len(),
            encoded_bytes,
            width: canvas.width(),
            height: canvas.height(),
        })
    }

    fn check_target(&self, source: &SourceImage, target: &TargetSpec) -> Result<()> {
        if source.width() == 0 || source.height() == 0 {
            return Err(ImageError::Decode {
                file: source.file_name().to_string(),
                reason: "image has no pixels".to_string(),
            }
            .into());
        }

        if target.width == 0 || target.height == 0 {
            return Err(ImageError::Context {
                width: target.width,
                height: target.height,
                reason: "canvas dimensions must be positive".to_string(),
            }
            .into());
        }

        let pixels = target.width as u64 * target.height as u64;
        if pixels > self.params.max_canvas_pixels {
            return Err(ImageError::Context {
                width: target.width,
                height: target.height,
                reason: format!(
                    "{} pixels exceeds the {} pixel limit",
                    pixels, self.params.max_canvas_pixels
                ),
            }
            .into());
        }

        // Fill resamples the whole source at cover size before cropping
        if target.treatment == TreatmentKind::Fill {
            let placement = Placement::cover(
                (source.width(), source.height()),
                (target.width, target.height),
            );
            let scaled = placement.width as u64 * placement.height as u64;
            if scaled > self.params.max_canvas_pixels {
                return Err(ImageError::Context {
                    width: placement.width,
                    height: placement.height,
                    reason: format!(
                        "scaled source for '{}' needs {} pixels, limit is {}",
                        target.name, scaled, self.params.max_canvas_pixels
                    ),
                }
                .into());
            }
        }

        target.validate()
    }
}

impl Default for ImageCompositor {
    fn default() -> Self {
        Self::new(CompositeParams::default())
    }
}
