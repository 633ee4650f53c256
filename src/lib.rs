pub mod annotation;
pub mod api;
pub mod commands;
pub mod config;
pub mod extractor;
pub mod slide;
pub mod utils;

pub use crate::api::PatchKit;

pub use annotation::{AnnotationSet, LabelPolicy};
pub use config::Config;
pub use extractor::{ExtractionDriver, ExtractionReport, PatchGeometry, SlideReport};
pub use slide::{DirectorySlideSource, ExtractError, ExtractResult, SlideImage, SlideSource};
