//! # Treatments
//!
//! The ways a source photo is painted onto a target canvas. Each target
//! carries an explicit [`TreatmentKind`] tag; [`for_kind`] maps the tag to
//! the implementation.
//!
//! ## Built-in Treatments
//!
//! - **Fill**: cover placement over an opaque background (storefront)
//! - **Blurred backdrop**: contained sharp photo over a stretched, blurred
//!   copy (catalog/ERP)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fotix::imaging::{SourceImage, TargetSpec};
//! use fotix::treatments::{self, TreatmentParams};
//!
//! # fn main() -> fotix::Result<()> {
//! let source = SourceImage::open("shirt.png")?;
//! let target = TargetSpec::blurred_backdrop("erp", 400, 400);
//!
//! let canvas = treatments::for_kind(target.treatment)
//!     .render(&source, &target, &TreatmentParams::default())?;
//! # Ok(())
//! # }
//! ```

pub mod traits;

pub mod backdrop;
pub mod fill;

pub use traits::{Treatment, TreatmentParams};

pub use backdrop::BlurredBackdropTreatment;
pub use fill::FillTreatment;

use crate::imaging::TreatmentKind;

static FILL: FillTreatment = FillTreatment;
static BLURRED_BACKDROP: BlurredBackdropTreatment = BlurredBackdropTreatment;

/// The treatment implementation for a target's tag
pub fn for_kind(kind: TreatmentKind) -> &'static dyn Treatment {
    match kind {
        TreatmentKind::Fill => &FILL,
        TreatmentKind::BlurredBackdrop => &BLURRED_BACKDROP,
    }
}
