//! Patch extraction core
//!
//! Turns point annotations on a whole-slide image into patch+mask
//! training pairs: geometry calculation, region reading, ground-truth
//! mask construction, assembly, filename planning and the driver that
//! runs the loop.

pub mod assembler;
pub mod driver;
pub mod filename;
pub mod geometry;
pub mod mask;
pub mod region_reader;
mod tests;

pub use assembler::assemble_patch;
pub use driver::{ExtractionDriver, ExtractionReport, SlideReport};
pub use filename::{build_patch_filename, build_patch_filenames};
pub use geometry::PatchGeometry;
pub use mask::build_ground_truth_mask;
pub use region_reader::{read_patch_region, PatchContext};
