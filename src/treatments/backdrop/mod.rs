//! # Blurred Backdrop Treatment
//!
//! The catalog/ERP look: the whole canvas is covered by a stretched and
//! heavily blurred copy of the photo, and the sharp photo is drawn on top
//! with a contain placement so nothing is cropped or distorted.

mod effect;

pub use effect::BlurredBackdropTreatment;

/// Blur strength matching a 20px CSS `blur()` filter
pub const DEFAULT_BLUR_SIGMA: f32 = 20.0;
