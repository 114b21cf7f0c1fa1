use std::future::Future;
use std::pin::Pin;

use crate::error::Result;

use super::types::{CampaignIdeas, ContentRequest, ProductContent};

/// Boxed future returned by [`ContentGenerator`] methods
pub type GenerateFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Produces marketing copy for a product photo via a hosted model
///
/// One request per call; implementations do not retry.
pub trait ContentGenerator: Send + Sync {
    /// Title, description and SEO tags for the product
    fn generate_product_content<'a>(&'a self, request: &'a ContentRequest) -> GenerateFuture<'a, ProductContent>;

    /// Marketing campaign suggestions for the product
    fn suggest_campaign_ideas<'a>(&'a self, request: &'a ContentRequest) -> GenerateFuture<'a, CampaignIdeas>;
}
