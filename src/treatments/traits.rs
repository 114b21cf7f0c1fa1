use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    imaging::{types::ResampleFilter, Canvas, SourceImage, TargetSpec},
};

use super::backdrop::DEFAULT_BLUR_SIGMA;

/// Core trait for the ways a target canvas can be painted
pub trait Treatment: Send + Sync {
    /// Returns the unique name of this treatment
    fn name(&self) -> &str;

    /// Returns a human-readable description of this treatment
    fn description(&self) -> &str;

    /// Paint `source` onto a fresh canvas of the target's dimensions
    ///
    /// # Arguments
    ///
    /// * `source` - The decoded product photo, only read
    /// * `target` - Dimensions of the canvas to produce
    /// * `params` - Shared drawing parameters
    fn render(&self, source: &SourceImage, target: &TargetSpec, params: &TreatmentParams) -> Result<Canvas>;
}

/// Drawing parameters shared by all treatments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentParams {
    /// Opaque colour painted behind the image
    pub background: [u8; 3],

    /// Standard deviation of the backdrop blur, in pixels
    pub blur_sigma: f32,

    /// Resampling filter used for every scale operation
    pub filter: ResampleFilter,
}

impl Default for TreatmentParams {
    fn default() -> Self {
        Self {
            background: [255, 255, 255],
            blur_sigma: DEFAULT_BLUR_SIGMA,
            filter: ResampleFilter::default(),
        }
    }
}

impl TreatmentParams {
    pub fn filter_type(&self) -> FilterType {
        self.filter.into()
    }
}
