use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::{
    ai::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL},
    error::{ConfigError, Result},
    imaging::{
        types::ResampleFilter, CompositeParams, Dimensions, TargetSpec,
    },
    treatments::{backdrop::DEFAULT_BLUR_SIGMA, TreatmentParams},
};

/// Smallest width or height accepted for the site and ERP images
pub const MIN_DIMENSION: u32 = 50;

/// Largest width or height accepted for the site and ERP images
pub const MAX_DIMENSION: u32 = 4000;

/// Main configuration for Fotix
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output variants and encoding
    pub output: OutputConfig,

    /// Hosted model settings
    pub ai: AiConfig,

    /// Input limits
    pub upload: UploadConfig,

    /// Batch scheduling
    pub processing: ProcessingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.output.validate()?;
        self.ai.validate()?;
        self.upload.validate()?;
        self.processing.validate()?;
        Ok(())
    }
}

/// Output variant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Storefront image, rendered with the fill treatment
    pub site: Dimensions,

    /// Catalog/ERP image, rendered with the blurred-backdrop treatment
    pub erp: Dimensions,

    /// Additional targets rendered after site and ERP
    pub extra_targets: Vec<TargetSpec>,

    /// JPEG quality (1-100)
    pub jpeg_quality: u8,

    /// Backdrop blur standard deviation in pixels
    pub blur_sigma: f32,

    /// Background colour behind the photo
    pub background: [u8; 3],

    /// Resampling filter
    pub filter: ResampleFilter,

    /// Largest canvas any target may request, in pixels
    pub max_canvas_pixels: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let params = CompositeParams::default();
        Self {
            site: Dimensions::new(1080, 1080),
            erp: Dimensions::new(400, 400),
            extra_targets: Vec::new(),
            jpeg_quality: params.jpeg_quality,
            blur_sigma: DEFAULT_BLUR_SIGMA,
            background: params.treatment.background,
            filter: params.treatment.filter,
            max_canvas_pixels: params.max_canvas_pixels,
        }
    }
}

impl OutputConfig {
    /// Targets in render order: site, ERP, then any extras
    pub fn targets(&self) -> Vec<TargetSpec> {
        let mut targets = vec![
            TargetSpec::new("site", self.site.width, self.site.height),
            TargetSpec::blurred_backdrop("erp", self.erp.width, self.erp.height),
        ];
        targets.extend(self.extra_targets.iter().cloned());
        targets
    }

    pub fn composite_params(&self) -> CompositeParams {
        CompositeParams {
            jpeg_quality: self.jpeg_quality,
            max_canvas_pixels: self.max_canvas_pixels,
            treatment: TreatmentParams {
                background: self.background,
                blur_sigma: self.blur_sigma,
                filter: self.filter,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        validate_dimensions("output.site", self.site)?;
        validate_dimensions("output.erp", self.erp)?;

        for target in &self.extra_targets {
            target.validate().map_err(|_| ConfigError::InvalidValue {
                key: format!("output.extra_targets.{}", target.name),
                value: target.dimensions().to_string(),
            })?;
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::InvalidValue {
                key: "output.jpeg_quality".to_string(),
                value: self.jpeg_quality.to_string()
            }.into());
        }

        if !self.blur_sigma.is_finite() || self.blur_sigma < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "output.blur_sigma".to_string(),
                value: self.blur_sigma.to_string()
            }.into());
        }

        if self.max_canvas_pixels == 0 {
            return Err(ConfigError::InvalidValue {
                key: "output.max_canvas_pixels".to_string(),
                value: self.max_canvas_pixels.to_string()
            }.into());
        }

        Ok(())
    }
}

/// Check a site/ERP size against the accepted range
pub fn validate_dimensions(key: &str, dimensions: Dimensions) -> Result<()> {
    let range = MIN_DIMENSION..=MAX_DIMENSION;
    if !range.contains(&dimensions.width) || !range.contains(&dimensions.height) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: format!("{} (each side must be {}-{}px)", dimensions, MIN_DIMENSION, MAX_DIMENSION)
        }.into());
    }
    Ok(())
}

/// Hosted model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Generate product copy at all
    pub enabled: bool,

    /// Also ask for marketing campaign ideas
    pub campaign_ideas: bool,

    /// API base URL
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// API key; when unset, GEMINI_API_KEY then CHAVE_API_GEMINI are used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            campaign_ideas: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl AiConfig {
    fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(ConfigError::InvalidValue {
                key: "ai.endpoint".to_string(),
                value: self.endpoint.clone()
            }.into());
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "ai.model".to_string(),
                value: self.model.clone()
            }.into());
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ai.timeout_secs".to_string(),
                value: self.timeout_secs.to_string()
            }.into());
        }

        Ok(())
    }
}

/// Input file limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted source file in bytes
    pub max_file_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 10 * 1024 * 1024,
        }
    }
}

impl UploadConfig {
    fn validate(&self) -> Result<()> {
        if self.max_file_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "upload.max_file_bytes".to_string(),
                value: self.max_file_bytes.to_string()
            }.into());
        }
        Ok(())
    }
}

/// Batch processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// How many products are processed at the same time
    pub max_concurrent_products: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_concurrent_products: num_cpus::get(),
        }
    }
}

impl ProcessingConfig {
    fn validate(&self) -> Result<()> {
        if self.max_concurrent_products == 0 {
            return Err(ConfigError::InvalidValue {
                key: "processing.max_concurrent_products".to_string(),
                value: self.max_concurrent_products.to_string()
            }.into());
        }
        Ok(())
    }
}
