//! Output filename construction
//!
//! Patch filenames are a pure function of their inputs, so a re-run
//! plans exactly the same names and can recognize already-produced
//! artifacts by existence alone.

use std::path::Path;

use crate::annotation::AnnotationSet;

/// Build the output filename for one patch
///
/// Format: `[{batch suffix}_]{slide stem}_{index}_Class_{label}.png`,
/// where the batch suffix is the last two characters of the batch id.
/// Without a resolvable batch id the prefix is simply omitted.
pub fn build_patch_filename(
    slide_id: &str,
    batch_id: Option<&str>,
    index: usize,
    class_label: &str,
) -> String {
    let stem = Path::new(slide_id)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| slide_id.to_string());

    let mut filename = String::new();
    if let Some(batch_id) = batch_id {
        filename.push_str(&batch_suffix(batch_id));
        filename.push('_');
    }
    filename.push_str(&format!("{}_{}_Class_{}.png", stem, index, class_label));
    filename
}

/// Plan the filenames for every point in a slide's annotation set
///
/// All points get a planned name, saved or not; the driver compares the
/// plan against the output directory to decide what to skip.
pub fn build_patch_filenames(
    slide_id: &str,
    batch_id: Option<&str>,
    annotations: &AnnotationSet,
) -> Vec<String> {
    annotations
        .patch_classes
        .iter()
        .enumerate()
        .map(|(i, class)| build_patch_filename(slide_id, batch_id, i, class))
        .collect()
}

/// Last two characters of the batch id
fn batch_suffix(batch_id: &str) -> String {
    let chars: Vec<char> = batch_id.chars().collect();
    let start = chars.len().saturating_sub(2);
    chars[start..].iter().collect()
}
