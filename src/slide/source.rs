//! Slide-source contract
//!
//! The extraction core never touches slide I/O directly. Everything it
//! needs from a slide store is expressed by the two traits in this module:
//! `SlideSource` resolves identifiers to open slides and their annotation
//! documents, `SlideImage` serves pixel regions from one open slide.
//! Concrete backends (a plain directory of images, an in-memory test
//! double) implement these traits.

use std::io::Read;
use std::path::PathBuf;

use image::RgbImage;

use crate::slide::errors::ExtractResult;

/// A store of whole-slide images and their annotation documents
pub trait SlideSource {
    /// Enumerate every slide identifier to process, in a stable order
    fn slide_ids(&self) -> ExtractResult<Vec<String>>;

    /// Open a slide by identifier
    ///
    /// # Returns
    /// An open slide handle, or `SlideNotFound` if the identifier
    /// resolves to nothing
    fn open(&self, slide_id: &str) -> ExtractResult<Box<dyn SlideImage>>;

    /// Locate a slide path by identifier pattern
    ///
    /// Used to recover grouping metadata (the batch/institute id) from
    /// the slide's location. Returning `None` is not an error.
    fn find_slide_path(&self, pattern: &str) -> Option<PathBuf>;

    /// Load the annotation documents associated with a slide as
    /// readable streams
    ///
    /// # Returns
    /// One reader per document, or `AnnotationNotFound` when the slide
    /// has no annotation document at all
    fn annotation_documents(&self, slide_id: &str) -> ExtractResult<Vec<Box<dyn Read>>>;
}

/// One open slide serving pixel regions
pub trait SlideImage {
    /// Full-resolution (level 0) dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32);

    /// Read a pixel region from the slide
    ///
    /// # Arguments
    /// * `location` - Upper-left corner in level-0 pixel coordinates,
    ///   may be negative
    /// * `level` - Pyramid level to read from, 0 is full resolution
    /// * `size` - Region dimensions in level pixels
    /// * `pad` - Fill the part of the region outside the slide with
    ///   zeros instead of failing
    ///
    /// # Returns
    /// A 3-channel RGB buffer of exactly `size` pixels. A region that
    /// misses the slide entirely is `RegionOutOfBounds` even with
    /// padding enabled.
    fn read_region(
        &self,
        location: (i64, i64),
        level: u32,
        size: (u32, u32),
        pad: bool,
    ) -> ExtractResult<RgbImage>;
}
