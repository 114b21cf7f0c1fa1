use tracing::debug;

use crate::{
    error::Result,
    imaging::{Canvas, Placement, SourceImage, TargetSpec},
    treatments::{Treatment, TreatmentParams},
};

/// Cover placement over an opaque background
pub struct FillTreatment;

impl FillTreatment {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FillTreatment {
    fn default() -> Self {
        Self::new()
    }
}

impl Treatment for FillTreatment {
    fn name(&self) -> &str {
        "fill"
    }

    fn description(&self) -> &str {
        "Photo scaled to cover the canvas, centred and cropped, over a solid background"
    }

    fn render(&self, source: &SourceImage, target: &TargetSpec, params: &TreatmentParams) -> Result<Canvas> {
        let canvas_size = (target.width, target.height);
        let placement = Placement::cover((source.width(), source.height()), canvas_size);

        debug!(
            "fill {}: {}x{} at ({}, {}), covers canvas: {}",
            target.name,
            placement.width,
            placement.height,
            placement.x,
            placement.y,
            placement.covers(canvas_size)
        );

        let mut canvas = Canvas::new_filled(target.width, target.height, params.background);
        canvas.draw_scaled(source.pixels(), placement, params.filter_type());

        Ok(canvas)
    }
}
