//! Ground-truth mask construction
//!
//! The training target for a patch is a synthetic image shaped like the
//! region buffer: black everywhere except a filled disk at the patch
//! center whose last channel carries `class_label + 1`. Zero stays
//! reserved for background, so class 0 is distinguishable from
//! unlabeled pixels.

use image::{Rgb, RgbImage};

use crate::slide::errors::{ExtractError, ExtractResult};

/// Build the ground-truth mask for one patch
///
/// # Arguments
/// * `region` - The region buffer whose shape the mask copies
/// * `class_label` - Class label string for the current point
/// * `radius` - Disk radius in pixels
/// * `center` - Disk center, the patch center
///
/// # Returns
/// The mask image, or `InvalidClassLabel` when the label is not a
/// non-negative integer or `label + 1` overflows the channel range
pub fn build_ground_truth_mask(
    region: &RgbImage,
    class_label: &str,
    radius: u32,
    center: (u32, u32),
) -> ExtractResult<RgbImage> {
    let class = class_label
        .parse::<u32>()
        .map_err(|_| ExtractError::InvalidClassLabel(class_label.to_string()))?;
    let fill = class + 1;
    if fill > u8::MAX as u32 {
        return Err(ExtractError::InvalidClassLabel(class_label.to_string()));
    }

    let (width, height) = region.dimensions();
    let mut mask = RgbImage::new(width, height);

    let radius_sq = (radius as i64) * (radius as i64);
    let (cx, cy) = (center.0 as i64, center.1 as i64);
    for y in 0..height {
        for x in 0..width {
            let dx = x as i64 - cx;
            let dy = y as i64 - cy;
            if dx * dx + dy * dy <= radius_sq {
                mask.put_pixel(x, y, Rgb([0, 0, fill as u8]));
            }
        }
    }

    Ok(mask)
}
