//! # AI Content Module
//!
//! Marketing copy for a product photo from a hosted generative model. The
//! model is a black box behind [`ContentGenerator`]; [`GeminiClient`] is
//! the production implementation.

pub mod data_uri;
pub mod gemini;
pub mod generator;
pub mod prompt;
pub mod types;

pub use data_uri::DataUri;
pub use gemini::GeminiClient;
pub use generator::{ContentGenerator, GenerateFuture};
pub use types::{CampaignIdeas, ContentRequest, ProductContent};
