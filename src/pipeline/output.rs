use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    ai::{CampaignIdeas, ProductContent},
    error::{FotixError, Result},
    imaging::{types::file_stem, RenderedVariant},
};

/// Everything produced for one source photo
#[derive(Debug, Clone)]
pub struct ProductReport {
    /// File name of the source photo
    pub source_name: String,

    /// Decoded source size (width, height)
    pub source_size: (u32, u32),

    /// One variant per target, in target order
    pub variants: Vec<RenderedVariant>,

    /// Generated copy, absent when AI is disabled
    pub content: Option<ProductContent>,

    /// Campaign suggestions, when requested
    pub campaign_ideas: Option<CampaignIdeas>,

    pub generated_at: DateTime<Utc>,
}

/// JSON written next to the variants
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentManifest<'a> {
    pub source: &'a str,
    pub generated_at: DateTime<Utc>,
    pub variants: Vec<VariantSummary<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a ProductContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_ideas: Option<&'a [String]>,
}

/// Variant metadata without the encoded bytes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSummary<'a> {
    pub name: &'a str,
    pub target: &'a str,
    pub byte_size: usize,
    pub width: u32,
    pub height: u32,
}

impl ProductReport {
    /// Name of the JSON manifest, `{stem}_content.json`
    pub fn manifest_name(&self) -> String {
        format!("{}_content.json", file_stem(&self.source_name))
    }

    pub fn manifest(&self) -> ContentManifest<'_> {
        ContentManifest {
            source: &self.source_name,
            generated_at: self.generated_at,
            variants: self
                .variants
                .iter()
                .map(|variant| VariantSummary {
                    name: &variant.name,
                    target: &variant.target,
                    byte_size: variant.byte_size,
                    width: variant.width,
                    height: variant.height,
                })
                .collect(),
            content: self.content.as_ref(),
            campaign_ideas: self
                .campaign_ideas
                .as_ref()
                .map(|ideas| ideas.campaign_ideas.as_slice()),
        }
    }

    /// Total encoded size of all variants
    pub fn total_bytes(&self) -> usize {
        self.variants.iter().map(|variant| variant.byte_size).sum()
    }

    /// Write every variant and the manifest into `dir`, returning the paths
    ///
    /// Variants with identical dimensions share a name, so the last one
    /// written wins.
    pub async fn write_to<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;

        let mut written = Vec::with_capacity(self.variants.len() + 1);

        for variant in &self.variants {
            let path = dir.join(&variant.name);
            tokio::fs::write(&path, &variant.encoded_bytes).await?;
            debug!("Wrote {:?} ({} bytes)", path, variant.byte_size);
            written.push(path);
        }

        let manifest = serde_json::to_vec_pretty(&self.manifest())
            .map_err(|e| FotixError::generic(format!("Manifest serialization failed: {}", e)))?;
        let manifest_path = dir.join(self.manifest_name());
        tokio::fs::write(&manifest_path, manifest).await?;
        written.push(manifest_path);

        info!(
            "💾 Saved {} file(s) for {} to {:?}",
            written.len(),
            self.source_name,
            dir
        );

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn report() -> ProductReport {
        ProductReport {
            source_name: "shirt.png".to_string(),
            source_size: (800, 400),
            variants: vec![
                RenderedVariant {
                    name: "shirt_1080x1080.jpg".to_string(),
                    target: "site".to_string(),
                    encoded_bytes: vec![0xFF, 0xD8, 0xFF, 0xD9],
                    byte_size: 4,
                    width: 1080,
                    height: 1080,
                },
                RenderedVariant {
                    name: "shirt_400x400.jpg".to_string(),
                    target: "erp".to_string(),
                    encoded_bytes: vec![0xFF, 0xD8, 0x00, 0xFF, 0xD9],
                    byte_size: 5,
                    width: 400,
                    height: 400,
                },
            ],
            content: Some(ProductContent {
                title: "Linen shirt".to_string(),
                description: "Light and breathable.".to_string(),
                seo_tags: vec!["linen".to_string(), "shirt".to_string()],
            }),
            campaign_ideas: None,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_manifest_omits_bytes() {
        let report = report();
        let json = serde_json::to_value(report.manifest()).unwrap();

        assert_eq!(json["source"], "shirt.png");
        assert_eq!(json["variants"][1]["name"], "shirt_400x400.jpg");
        assert_eq!(json["variants"][1]["byteSize"], 5);
        assert!(json["variants"][0].get("encodedBytes").is_none());
        assert_eq!(json["content"]["seoTags"][0], "linen");
        assert!(json.get("campaignIdeas").is_none());
        assert_eq!(report.total_bytes(), 9);
    }

    #[tokio::test]
    async fn test_write_to_directory() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let report = report();

        let written = report.write_to(&out).await.unwrap();

        assert_eq!(written.len(), 3);
        assert_eq!(
            std::fs::read(out.join("shirt_400x400.jpg")).unwrap(),
            vec![0xFF, 0xD8, 0x00, 0xFF, 0xD9]
        );
        let manifest: serde_json::Value =
            serde_json::from_slice(&std::fs::read(out.join("shirt_content.json")).unwrap()).unwrap();
        assert_eq!(manifest["content"]["title"], "Linen shirt");
    }
}
