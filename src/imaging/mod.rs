//! # Imaging Module
//!
//! Decoding product photos, describing output targets, and rendering the
//! JPEG variants.

pub mod canvas;
pub mod compositor;
pub mod placement;
pub mod types;

pub use canvas::Canvas;
pub use compositor::{CompositeParams, ImageCompositor};
pub use placement::Placement;
pub use types::{Dimensions, RenderedVariant, SourceImage, TargetSpec, TreatmentKind};
