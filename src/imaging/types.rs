use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::imageops::FilterType;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::{ImageError, Result};

/// A decoded product photo
///
/// The pixels are kept as RGBA so transparent sources composite over
/// whatever the treatment paints underneath them.
#[derive(Clone, Debug)]
pub struct SourceImage {
    file_name: String,
    pixels: RgbaImage,
}

impl SourceImage {
    /// Decode an image from raw file bytes
    ///
    /// The format is sniffed from the bytes, so the file name only matters
    /// for naming the rendered variants.
    pub fn decode<S: Into<String>>(file_name: S, bytes: &[u8]) -> Result<Self> {
        let file_name = file_name.into();
        let decoded = image::load_from_memory(bytes).map_err(|e| ImageError::Decode {
            file: file_name.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            file_name,
            pixels: decoded.to_rgba8(),
        })
    }

    /// Read and decode an image file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Self::decode(display_name(path), &bytes)
    }

    /// Wrap an already decoded buffer
    pub fn from_pixels<S: Into<String>>(file_name: S, pixels: RgbaImage) -> Self {
        Self {
            file_name: file_name.into(),
            pixels,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Last path component of `path`, used as the source's display name
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Strip the final `.ext` from a file name
///
/// A name without a dot, or whose only dot is the leading one, is returned
/// unchanged.
pub fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}

/// Output name for a variant: `{stem}_{width}x{height}.jpg`
pub fn variant_name(source_file_name: &str, width: u32, height: u32) -> String {
    format!("{}_{}x{}.jpg", file_stem(source_file_name), width, height)
}

/// How a target canvas is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TreatmentKind {
    /// Scale to cover the canvas over an opaque background, cropping overflow
    #[default]
    Fill,

    /// Stretched and blurred full-bleed copy behind a sharp contained copy
    BlurredBackdrop,
}

impl TreatmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TreatmentKind::Fill => "fill",
            TreatmentKind::BlurredBackdrop => "blurred-backdrop",
        }
    }
}

/// One requested output rendition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Label shown to the user, e.g. "site" or "erp"
    pub name: String,

    pub width: u32,

    pub height: u32,

    #[serde(default)]
    pub treatment: TreatmentKind,
}

impl TargetSpec {
    /// Create a target using the default fill treatment
    pub fn new<S: Into<String>>(name: S, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            treatment: TreatmentKind::Fill,
        }
    }

    /// Create a target using the blurred-backdrop treatment
    pub fn blurred_backdrop<S: Into<String>>(name: S, width: u32, height: u32) -> Self {
        Self::new(name, width, height).with_treatment(TreatmentKind::BlurredBackdrop)
    }

    pub fn with_treatment(mut self, treatment: TreatmentKind) -> Self {
        self.treatment = treatment;
        self
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Check that the target describes a drawable canvas
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ImageError::InvalidTarget {
                name: self.name.clone(),
                details: "name must not be empty".to_string(),
            }
            .into());
        }

        if self.width == 0 || self.height == 0 {
            return Err(ImageError::InvalidTarget {
                name: self.name.clone(),
                details: format!("dimensions must be positive, got {}", self.dimensions()),
            }
            .into());
        }

        Ok(())
    }
}

/// A rendered and encoded output image
#[derive(Debug, Clone)]
pub struct RenderedVariant {
    /// File name, `{stem}_{width}x{height}.jpg`
    pub name: String,

    /// Label of the target this was rendered for
    pub target: String,

    /// JPEG bytes
    pub encoded_bytes: Vec<u8>,

    pub byte_size: usize,

    pub width: u32,

    pub height: u32,
}

/// A `width x height` pair, written as `1080x1080`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Dimensions {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (width, height) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;

        let width = width
            .trim()
            .parse()
            .map_err(|_| format!("invalid width '{}'", width))?;
        let height = height
            .trim()
            .parse()
            .map_err(|_| format!("invalid height '{}'", height))?;

        Ok(Self::new(width, height))
    }
}

/// Resampling filter used when scaling the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
