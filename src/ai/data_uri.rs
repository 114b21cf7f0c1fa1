use std::fmt;
use std::path::Path;
use std::str::FromStr;

use base64::Engine;
use image::ImageFormat;

use crate::error::AiError;

/// An image embedded as `data:<mime>;base64,<payload>`
#[derive(Clone, PartialEq, Eq)]
pub struct DataUri {
    mime_type: String,
    data: Vec<u8>,
}

impl DataUri {
    pub fn new<S: Into<String>>(mime_type: S, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Wrap raw file bytes, sniffing the MIME type from the content
    ///
    /// Falls back to the file extension, then to `application/octet-stream`.
    pub fn from_file_bytes(file_name: &str, data: Vec<u8>) -> Self {
        let mime_type = image::guess_format(&data)
            .ok()
            .or_else(|| ImageFormat::from_path(Path::new(file_name)).ok())
            .and_then(image_mime_type)
            .unwrap_or("application/octet-stream");

        Self::new(mime_type, data)
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The payload, base64 encoded without the `data:` prefix
    pub fn base64_data(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}

fn image_mime_type(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Bmp => Some("image/bmp"),
        ImageFormat::Tiff => Some("image/tiff"),
        _ => None,
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.base64_data())
    }
}

// Payloads run to megabytes; keep them out of debug logs
impl fmt::Debug for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataUri")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl FromStr for DataUri {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |details: &str| AiError::InvalidDataUri {
            details: details.to_string(),
        };

        let rest = s
            .strip_prefix("data:")
            .ok_or_else(|| invalid("missing 'data:' prefix"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| invalid("missing ',' separator"))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| invalid("only base64 payloads are supported"))?;

        if mime_type.is_empty() {
            return Err(invalid("missing MIME type"));
        }

        let data = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| invalid(&format!("bad base64 payload: {}", e)))?;

        Ok(Self::new(mime_type, data))
    }
}
