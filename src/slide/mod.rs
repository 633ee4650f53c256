//! Slide access layer
//!
//! This module defines the narrow contract the extraction core consumes
//! from a slide store, the crate-wide error types, and a concrete
//! directory-backed implementation of that contract.

pub mod directory;
pub mod errors;
pub mod source;

pub use directory::{DirectorySlideSource, OpenedSlide};
pub use errors::{ExtractError, ExtractResult};
pub use source::{SlideImage, SlideSource};
