//! Patch geometry calculation
//!
//! Derives the pixel geometry shared by every patch in a run: the output
//! patch size, the scaled size actually read from the slide, and the
//! patch center where the ground-truth disk is drawn.

/// Pixel geometry of a patch, fixed for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchGeometry {
    /// Output patch dimensions in pixels
    pub patch_size: (u32, u32),
    /// Dimensions read from the slide before resizing, each dimension
    /// rounded to the nearest integer independently
    pub scaled_size: (u32, u32),
    /// Center of the output patch, rounded to the nearest pixel
    pub center: (u32, u32),
}

impl PatchGeometry {
    /// Compute the geometry for a patch size and resolution scale
    ///
    /// # Arguments
    /// * `patch_width` - Output patch width in pixels
    /// * `patch_height` - Output patch height in pixels
    /// * `resolution_scale` - Ratio between the native read size and the
    ///   output size; 2.0 reads twice the pixels and downsamples
    pub fn new(patch_width: u32, patch_height: u32, resolution_scale: f64) -> Self {
        let scaled_size = (
            (patch_width as f64 * resolution_scale).round() as u32,
            (patch_height as f64 * resolution_scale).round() as u32,
        );
        let center = (
            (patch_width as f64 / 2.0).round() as u32,
            (patch_height as f64 / 2.0).round() as u32,
        );
        PatchGeometry {
            patch_size: (patch_width, patch_height),
            scaled_size,
            center,
        }
    }

    /// Upper-left read origin for a patch centered on the given point
    ///
    /// `origin = point - scaled_size / 2`, truncated toward zero. The
    /// origin may be negative near the slide border; padded reads cover
    /// that case.
    pub fn read_origin(&self, point: (i64, i64)) -> (i64, i64) {
        (
            (point.0 as f64 - self.scaled_size.0 as f64 / 2.0).trunc() as i64,
            (point.1 as f64 - self.scaled_size.1 as f64 / 2.0).trunc() as i64,
        )
    }
}
