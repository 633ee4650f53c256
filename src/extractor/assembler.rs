//! Patch assembly
//!
//! Joins the region buffer and its ground-truth mask side by side into
//! the single image that gets written to disk.

use image::{imageops, RgbImage};

/// Concatenate region and mask horizontally
///
/// Both images must have the same height; the caller guarantees this
/// because the mask is built from the region's own shape.
///
/// # Returns
/// One image of the region's height and double its width, region on the
/// left, mask on the right
pub fn assemble_patch(region: &RgbImage, mask: &RgbImage) -> RgbImage {
    let (width, height) = region.dimensions();
    let mut patch = RgbImage::new(width + mask.width(), height);
    imageops::replace(&mut patch, region, 0, 0);
    imageops::replace(&mut patch, mask, width as i64, 0);
    patch
}
