//! # Fotix
//!
//! Turn one product photo into storefront-ready images and marketing copy.
//!
//! Every photo is composited onto fixed-size JPEG canvases (a cover-cropped
//! site image and a blurred-backdrop ERP image by default) while a hosted
//! generative model writes a title, description and SEO tags for it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fotix::{config::Config, pipeline::ProductEngine};
//!
//! # #[tokio::main]
//! # async fn main() -> fotix::Result<()> {
//! let engine = ProductEngine::from_config(Config::default())?;
//!
//! let report = engine.process_file("shirt.png", Some("Linen shirt, navy")).await?;
//! report.write_to("output/").await?;
//! # Ok(())
//! # }
//! ```
//!
//! Compositing alone needs no network access:
//!
//! ```rust,no_run
//! use fotix::imaging::{ImageCompositor, SourceImage, TargetSpec};
//!
//! # fn main() -> fotix::Result<()> {
//! let source = SourceImage::open("shirt.png")?;
//! let variants = ImageCompositor::default().composite(
//!     &source,
//!     &[
//!         TargetSpec::new("site", 1080, 1080),
//!         TargetSpec::blurred_backdrop("erp", 400, 400),
//!     ],
//! )?;
//! assert_eq!(variants[0].name, "shirt_1080x1080.jpg");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`imaging`] - Decoding, placement math, canvases and the compositor
//! - [`treatments`] - The ways a canvas can be painted (fill, blurred backdrop)
//! - [`ai`] - Generated product copy behind the [`ContentGenerator`](ai::ContentGenerator) trait
//! - [`pipeline`] - Per-product orchestration and output files
//! - [`config`] - Configuration management

pub mod ai;
pub mod config;
pub mod error;
pub mod imaging;
pub mod pipeline;
pub mod treatments;

// Re-export commonly used types for convenience
pub use crate::{
    ai::{ContentGenerator, GeminiClient, ProductContent},
    config::Config,
    error::{FotixError, Result},
    imaging::{ImageCompositor, RenderedVariant, SourceImage, TargetSpec, TreatmentKind},
    pipeline::{ProductEngine, ProductReport},
};
