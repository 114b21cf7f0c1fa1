use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, info, warn};

use crate::{
    ai::{CampaignIdeas, ContentGenerator, ContentRequest, DataUri, GeminiClient, ProductContent},
    config::Config,
    error::{FotixError, PipelineError, Result},
    imaging::{types::display_name, ImageCompositor, SourceImage},
};

use super::output::ProductReport;

/// Turns product photos into sized variants plus generated copy
///
/// For each product the engine:
/// 1. Checks the upload limit
/// 2. Composites every configured target on the blocking pool
/// 3. Asks the content generator for copy, concurrently with step 2
/// 4. Joins both halves into a [`ProductReport`]
///
/// Cloning is cheap; clones share the compositor and the generator.
#[derive(Clone)]
pub struct ProductEngine {
    config: Arc<Config>,
    compositor: Arc<ImageCompositor>,
    generator: Option<Arc<dyn ContentGenerator>>,
}

impl ProductEngine {
    /// Create an engine with an explicit generator (or none, to skip AI)
    pub fn new(config: Config, generator: Option<Arc<dyn ContentGenerator>>) -> Self {
        let compositor = ImageCompositor::new(config.output.composite_params());
        Self {
            config: Arc::new(config),
            compositor: Arc::new(compositor),
            generator,
        }
    }

    /// Create an engine backed by Gemini when `ai.enabled` is set
    pub fn from_config(config: Config) -> Result<Self> {
        let generator: Option<Arc<dyn ContentGenerator>> = if config.ai.enabled {
            let client = GeminiClient::from_config(&config.ai)?;
            info!("🤖 Content generation enabled (model: {})", client.model());
            Some(Arc::new(client))
        } else {
            info!("🤖 Content generation disabled");
            None
        };

        Ok(Self::new(config, generator))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read one photo from disk and process it
    pub async fn process_file<P: AsRef<Path>>(
        &self,
        path: P,
        description: Option<&str>,
    ) -> Result<ProductReport> {
        let path = path.as_ref();
        let file_name = display_name(path);

        let size = tokio::fs::metadata(path).await?.len();
        self.check_size(&file_name, size)?;

        debug!("Reading {:?} ({} bytes)", path, size);
        let bytes = tokio::fs::read(path).await?;

        self.process_bytes(file_name, bytes, description).await
    }

    /// Process a photo that is already in memory
    pub async fn process_bytes(
        &self,
        file_name: String,
        bytes: Vec<u8>,
        description: Option<&str>,
    ) -> Result<ProductReport> {
        self.check_size(&file_name, bytes.len() as u64)?;

        info!("📷 Processing {}", file_name);

        let request = self.content_request(&file_name, &bytes, description);

        // Compositing is CPU-bound; generation waits on the network
        let compositor = Arc::clone(&self.compositor);
        let targets = self.config.output.targets();
        let name = file_name.clone();
        let compose = tokio::task::spawn_blocking(move || {
            let source = SourceImage::decode(name, &bytes)?;
            let variants = compositor.composite(&source, &targets)?;
            Ok::<_, FotixError>(((source.width(), source.height()), variants))
        });

        let (composed, generated) = tokio::join!(compose, self.generate(request.as_ref()));

        let (source_size, variants) = composed.map_err(|e| PipelineError::TaskFailed {
            reason: e.to_string(),
        })??;
        let (content, campaign_ideas) = generated?;

        info!(
            "   ✅ {}: {} variant(s){}",
            file_name,
            variants.len(),
            if content.is_some() { " + content" } else { "" }
        );

        Ok(ProductReport {
            source_name: file_name,
            source_size,
            variants,
            content,
            campaign_ideas,
            generated_at: Utc::now(),
        })
    }

    /// Process many photos, at most `processing.max_concurrent_products` at once
    ///
    /// One result per input path, in input order. A failed product does not
    /// stop the others.
    pub async fn process_batch(
        &self,
        paths: &[PathBuf],
        description: Option<&str>,
    ) -> Vec<(PathBuf, Result<ProductReport>)> {
        let limit = self.config.processing.max_concurrent_products.max(1);
        let semaphore = Arc::new(Semaphore::new(limit));
        let description = description.map(str::to_string);

        info!("📦 Processing {} product(s), {} at a time", paths.len(), limit);

        let mut tasks = JoinSet::new();
        for (index, path) in paths.iter().cloned().enumerate() {
            let engine = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let description = description.clone();

            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => engine.process_file(&path, description.as_deref()).await,
                    Err(e) => Err(PipelineError::TaskFailed {
                        reason: e.to_string(),
                    }
                    .into()),
                };
                (index, result)
            });
        }

        let mut slots: Vec<Option<Result<ProductReport>>> = paths.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => {
                    if let Err(e) = &result {
                        warn!("❌ {}: {}", paths[index].display(), e);
                    }
                    slots[index] = Some(result);
                }
                Err(e) => warn!("Product task aborted: {}", e),
            }
        }

        paths
            .iter()
            .cloned()
            .zip(slots)
            .map(|(path, slot)| {
                let result = slot.unwrap_or_else(|| {
                    Err(PipelineError::TaskFailed {
                        reason: "task did not complete".to_string(),
                    }
                    .into())
                });
                (path, result)
            })
            .collect()
    }

    /// The model's view of the photo; `None` when there is no generator
    fn content_request(
        &self,
        file_name: &str,
        bytes: &[u8],
        description: Option<&str>,
    ) -> Option<ContentRequest> {
        self.generator.as_ref()?;
        let photo = DataUri::from_file_bytes(file_name, bytes.to_vec());
        Some(ContentRequest::new(photo).with_description(description))
    }

    async fn generate(
        &self,
        request: Option<&ContentRequest>,
    ) -> Result<(Option<ProductContent>, Option<CampaignIdeas>)> {
        let (Some(generator), Some(request)) = (&self.generator, request) else {
            return Ok((None, None));
        };

        let ideas = async {
            if self.config.ai.campaign_ideas {
                generator.suggest_campaign_ideas(request).await.map(Some)
            } else {
                Ok(None)
            }
        };

        let (content, ideas) = tokio::try_join!(generator.generate_product_content(request), ideas)?;
        Ok((Some(content), ideas))
    }

    fn check_size(&self, file_name: &str, size: u64) -> Result<()> {
        let limit = self.config.upload.max_file_bytes;
        if size > limit {
            return Err(PipelineError::FileTooLarge {
                path: file_name.to_string(),
                size,
                limit,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ai::GenerateFuture,
        error::{AiError, ImageError},
        imaging::Dimensions,
    };
    use image::{ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingGenerator {
        descriptions: Mutex<Vec<Option<String>>>,
        fail: bool,
    }

    impl ContentGenerator for RecordingGenerator {
        fn generate_product_content<'a>(
            &'a self,
            request: &'a ContentRequest,
        ) -> GenerateFuture<'a, ProductContent> {
            Box::pin(async move {
                self.descriptions
                    .lock()
                    .unwrap()
                    .push(request.description.clone());
                if self.fail {
                    return Err(AiError::Generation {
                        message: "quota exceeded".to_string(),
                    }
                    .into());
                }
                Ok(ProductContent {
                    title: format!("Product ({})", request.photo.mime_type()),
                    description: "A fine product.".to_string(),
                    seo_tags: vec!["fine".to_string()],
                })
            })
        }

        fn suggest_campaign_ideas<'a>(
            &'a self,
            _request: &'a ContentRequest,
        ) -> GenerateFuture<'a, CampaignIdeas> {
            Box::pin(async move {
                Ok(CampaignIdeas {
                    campaign_ideas: vec!["Summer sale".to_string()],
                })
            })
        }
    }

    fn small_config() -> Config {
        let mut config = Config::default();
        config.output.site = Dimensions::new(60, 80);
        config.output.erp = Dimensions::new(50, 50);
        config.output.blur_sigma = 2.0;
        config.processing.max_concurrent_products = 2;
        config
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[tokio::test]
    async fn test_process_bytes_with_generator() {
        let generator = Arc::new(RecordingGenerator::default());
        let engine = ProductEngine::new(small_config(), Some(generator.clone()));

        let report = engine
            .process_bytes("mug.png".to_string(), png_bytes(120, 90), Some("Blue mug"))
            .await
            .unwrap();

        assert_eq!(report.source_size, (120, 90));
        assert_eq!(report.variants.len(), 2);
        assert_eq!(report.variants[0].name, "mug_60x80.jpg");
        assert_eq!(report.variants[1].name, "mug_50x50.jpg");
        assert_eq!(report.content.unwrap().title, "Product (image/png)");
        assert!(report.campaign_ideas.is_none());
        assert_eq!(
            *generator.descriptions.lock().unwrap(),
            vec![Some("Blue mug".to_string())]
        );
    }

    #[tokio::test]
    async fn test_campaign_ideas_when_enabled() {
        let mut config = small_config();
        config.ai.campaign_ideas = true;
        let engine = ProductEngine::new(config, Some(Arc::new(RecordingGenerator::default())));

        let report = engine
            .process_bytes("mug.png".to_string(), png_bytes(40, 40), None)
            .await
            .unwrap();

        assert_eq!(report.campaign_ideas.unwrap().campaign_ideas, vec!["Summer sale"]);
    }

    #[tokio::test]
    async fn test_without_generator() {
        let engine = ProductEngine::new(small_config(), None);
        let report = engine
            .process_bytes("mug.png".to_string(), png_bytes(40, 40), None)
            .await
            .unwrap();

        assert!(report.content.is_none());
        assert_eq!(report.variants.len(), 2);
    }

    #[test]
    fn test_content_request_only_with_generator() {
        let bytes = png_bytes(8, 8);

        let offline = ProductEngine::new(small_config(), None);
        assert!(offline.content_request("mug.png", &bytes, Some("Blue mug")).is_none());

        let online = ProductEngine::new(small_config(), Some(Arc::new(RecordingGenerator::default())));
        let request = online
            .content_request("mug.png", &bytes, Some("Blue mug"))
            .unwrap();
        assert_eq!(request.photo.mime_type(), "image/png");
        assert_eq!(request.photo.data(), bytes.as_slice());
        assert_eq!(request.description(), Some("Blue mug"));
    }

    #[tokio::test]
    async fn test_generator_failure_fails_product() {
        let generator = RecordingGenerator {
            fail: true,
            ..Default::default()
        };
        let engine = ProductEngine::new(small_config(), Some(Arc::new(generator)));

        let result = engine
            .process_bytes("mug.png".to_string(), png_bytes(40, 40), None)
            .await;

        assert!(matches!(result, Err(FotixError::Ai(AiError::Generation { .. }))));
    }

    #[tokio::test]
    async fn test_oversized_file_rejected() {
        let mut config = small_config();
        config.upload.max_file_bytes = 16;
        let engine = ProductEngine::new(config, None);

        let result = engine
            .process_bytes("mug.png".to_string(), png_bytes(40, 40), None)
            .await;

        assert!(matches!(
            result,
            Err(FotixError::Pipeline(PipelineError::FileTooLarge { limit: 16, .. }))
        ));
    }

    #[tokio::test]
    async fn test_batch_keeps_input_order() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.png");
        let broken = dir.path().join("broken.jpg");
        let other = dir.path().join("other.png");
        std::fs::write(&good, png_bytes(30, 60)).unwrap();
        std::fs::write(&broken, b"not an image").unwrap();
        std::fs::write(&other, png_bytes(60, 30)).unwrap();

        let engine = ProductEngine::new(small_config(), None);
        let paths = vec![good.clone(), broken.clone(), other.clone()];
        let results = engine.process_batch(&paths, None).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, good);
        assert_eq!(results[1].0, broken);
        assert_eq!(results[2].0, other);

        assert_eq!(results[0].1.as_ref().unwrap().source_size, (30, 60));
        assert!(matches!(
            results[1].1,
            Err(FotixError::Image(ImageError::Decode { .. }))
        ));
        assert_eq!(results[2].1.as_ref().unwrap().source_name, "other.png");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let engine = ProductEngine::new(small_config(), None);
        let result = engine.process_file("/no/such/photo.png", None).await;
        assert!(matches!(result, Err(FotixError::Io(_))));
    }
}
