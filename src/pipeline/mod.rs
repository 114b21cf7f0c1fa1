//! # Product Pipeline
//!
//! Ties the compositor and the content generator together per product
//! photo, and writes the results to disk.

pub mod engine;
pub mod output;

pub use engine::ProductEngine;
pub use output::{ContentManifest, ProductReport, VariantSummary};
