use serde::{Deserialize, Serialize};

use super::data_uri::DataUri;

/// Marketing copy generated for one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductContent {
    pub title: String,
    pub description: String,
    pub seo_tags: Vec<String>,
}

/// Campaign suggestions for one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignIdeas {
    pub campaign_ideas: Vec<String>,
}

/// What the model is shown: the photo and an optional free-text description
#[derive(Debug, Clone)]
pub struct ContentRequest {
    pub photo: DataUri,
    pub description: Option<String>,
}

impl ContentRequest {
    pub fn new(photo: DataUri) -> Self {
        Self {
            photo,
            description: None,
        }
    }

    /// Attach a description; blank text is treated as absent
    pub fn with_description<S: Into<String>>(mut self, description: Option<S>) -> Self {
        self.description = description
            .map(Into::into)
            .filter(|text: &String| !text.trim().is_empty());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
