//! Region reading for one annotated point
//!
//! Reads the scaled region around a point from the slide, normalizes it
//! to 3-channel RGB and resizes it to the output patch size. The result
//! travels through the rest of the iteration as a `PatchContext` value,
//! so no state is shared between points.

use image::imageops::{self, FilterType};
use image::RgbImage;
use log::debug;

use crate::annotation::AnnotationSet;
use crate::extractor::geometry::PatchGeometry;
use crate::slide::errors::ExtractResult;
use crate::slide::source::SlideImage;

/// Per-iteration state for one annotated point
pub struct PatchContext {
    /// Index of the point within the slide's annotation set
    pub index: usize,
    /// Class label recorded for downstream mask construction
    pub class_label: String,
    /// Region pixels, RGB, already resized to the output patch size
    pub region: RgbImage,
}

/// Read the region for one point and prepare it as a patch context
///
/// The read happens at the point's precomputed origin with the scaled
/// size and edge padding enabled, so points near the slide border still
/// produce a full-size buffer. A read that misses the slide entirely
/// propagates as an error and is fatal for the point.
///
/// # Arguments
/// * `slide` - The open slide to read from
/// * `annotations` - Parsed annotation set for the current slide
/// * `geometry` - Patch geometry for the run
/// * `level` - Pyramid level to read at, 0 is full resolution
/// * `index` - Index of the point to read
pub fn read_patch_region(
    slide: &dyn SlideImage,
    annotations: &AnnotationSet,
    geometry: &PatchGeometry,
    level: u32,
    index: usize,
) -> ExtractResult<PatchContext> {
    let origin = annotations.patch_origins[index];
    debug!(
        "Reading region for point {} at ({}, {}), size {}x{}, level {}",
        index, origin.0, origin.1, geometry.scaled_size.0, geometry.scaled_size.1, level
    );

    let region = slide.read_region(origin, level, geometry.scaled_size, true)?;

    // Reconcile the physically scaled read with the fixed output size
    let region = if region.dimensions() != geometry.patch_size {
        imageops::resize(
            &region,
            geometry.patch_size.0,
            geometry.patch_size.1,
            FilterType::Triangle,
        )
    } else {
        region
    };

    Ok(PatchContext {
        index,
        class_label: annotations.patch_classes[index].clone(),
        region,
    })
}
