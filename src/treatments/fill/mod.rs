//! # Fill Treatment
//!
//! The storefront look: the photo scaled uniformly to cover the whole
//! canvas, centred, with overflow cropped. The canvas is painted with the
//! background colour first, which only shows through transparent pixels.

mod effect;

pub use effect::FillTreatment;
