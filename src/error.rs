use thiserror::Error;

/// Main error type for the Fotix library
#[derive(Error, Debug)]
pub enum FotixError {
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),

    #[error("AI generation error: {0}")]
    Ai(#[from] AiError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Compositing errors
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to decode image '{file}': {reason}")]
    Decode { file: String, reason: String },

    #[error("Drawing surface unavailable for {width}x{height}: {reason}")]
    Context {
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("Failed to encode '{name}' as JPEG: {reason}")]
    Encode { name: String, reason: String },

    #[error("Invalid target '{name}': {details}")]
    InvalidTarget { name: String, details: String },
}

/// Errors from the hosted generative model
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Failed to generate AI content: {message}")]
    Generation { message: String },

    #[error("No API key configured (set ai.api_key, GEMINI_API_KEY or CHAVE_API_GEMINI)")]
    MissingApiKey,

    #[error("Invalid data URI: {details}")]
    InvalidDataUri { details: String },
}

/// Per-product pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File '{path}' is {size} bytes, limit is {limit} bytes")]
    FileTooLarge { path: String, size: u64, limit: u64 },

    #[error("Background task failed: {reason}")]
    TaskFailed { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using FotixError
pub type Result<T> = std::result::Result<T, FotixError>;

impl FotixError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Message suitable for an end-user notification
    pub fn user_message(&self) -> String {
        match self {
            Self::Image(ImageError::Decode { file, .. }) => {
                format!("Could not read '{}' as an image. Please upload a PNG, JPG, GIF, BMP or WebP file.", file)
            }
            Self::Pipeline(PipelineError::FileTooLarge { path, limit, .. }) => {
                format!(
                    "'{}' is too large. Please upload an image smaller than {}.",
                    path,
                    human_size(*limit)
                )
            }
            Self::Ai(AiError::MissingApiKey) => {
                "AI content generation needs a Gemini API key. Set GEMINI_API_KEY or run with --no-ai.".to_string()
            }
            Self::Ai(AiError::Generation { .. }) => self.source_message(),
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }

    fn source_message(&self) -> String {
        match self {
            Self::Ai(inner) => inner.to_string(),
            other => other.to_string(),
        }
    }
}

/// Whole megabytes when the size is at least 1 MiB, bytes otherwise
fn human_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}
