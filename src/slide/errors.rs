//! Custom error types for slide and patch processing

use std::fmt;
use std::io;

/// Patch-extraction error types
#[derive(Debug)]
pub enum ExtractError {
    /// I/O error
    IoError(io::Error),
    /// No slide file matched the given identifier
    SlideNotFound(String),
    /// No annotation document was found for a slide
    AnnotationNotFound(String),
    /// A region read missed the slide bounds entirely
    RegionOutOfBounds { x: i64, y: i64, width: u32, height: u32 },
    /// Class label is not a usable non-negative integer
    InvalidClassLabel(String),
    /// Malformed annotation markup
    XmlError(String),
    /// Image decode/encode failure
    ImageError(String),
    /// Bad configuration value or file
    ConfigError(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::IoError(e) => write!(f, "I/O error: {}", e),
            ExtractError::SlideNotFound(id) => write!(f, "Slide not found: {}", id),
            ExtractError::AnnotationNotFound(id) => {
                write!(f, "No annotation document for slide: {}", id)
            }
            ExtractError::RegionOutOfBounds { x, y, width, height } => write!(
                f,
                "Region read outside slide bounds: x={}, y={}, width={}, height={}",
                x, y, width, height
            ),
            ExtractError::InvalidClassLabel(label) => {
                write!(f, "Invalid class label: {:?}", label)
            }
            ExtractError::XmlError(msg) => write!(f, "Annotation markup error: {}", msg),
            ExtractError::ImageError(msg) => write!(f, "Image error: {}", msg),
            ExtractError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ExtractError::GenericError(msg) => write!(f, "Extraction error: {}", msg),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<io::Error> for ExtractError {
    fn from(error: io::Error) -> Self {
        ExtractError::IoError(error)
    }
}

impl From<String> for ExtractError {
    fn from(msg: String) -> Self {
        ExtractError::GenericError(msg)
    }
}

impl From<image::ImageError> for ExtractError {
    fn from(error: image::ImageError) -> Self {
        ExtractError::ImageError(error.to_string())
    }
}

/// Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;
