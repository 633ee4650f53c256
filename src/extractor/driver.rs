//! Extraction driver
//!
//! Orchestrates the per-slide, per-point extraction loop: load the slide
//! and its annotation documents, parse the points, plan every output
//! filename, then read/mask/assemble/save each point that is not already
//! on disk. Mask-construction failures are counted and skipped; every
//! other failure propagates and aborts the run.

use std::collections::HashSet;
use std::fs;

use log::{debug, info, warn};

use crate::annotation::parser::parse_documents;
use crate::config::Config;
use crate::extractor::assembler::assemble_patch;
use crate::extractor::filename::build_patch_filenames;
use crate::extractor::geometry::PatchGeometry;
use crate::extractor::mask::build_ground_truth_mask;
use crate::extractor::region_reader::read_patch_region;
use crate::slide::errors::{ExtractError, ExtractResult};
use crate::slide::source::SlideSource;
use crate::utils::logger::Logger;
use crate::utils::progress::ProgressTracker;

/// Outcome of one slide's extraction
#[derive(Debug)]
pub struct SlideReport {
    /// Slide identifier
    pub slide_id: String,
    /// Number of planned patches (all annotated points)
    pub planned: usize,
    /// Successfully extracted patches: planned minus errors
    pub extracted: usize,
    /// Mask-construction failures counted during the loop
    pub errors: usize,
}

/// Outcome of a whole extraction run
#[derive(Debug, Default)]
pub struct ExtractionReport {
    /// Per-slide reports in processing order
    pub slides: Vec<SlideReport>,
}

impl ExtractionReport {
    /// Total patches extracted across all slides
    pub fn total_extracted(&self) -> usize {
        self.slides.iter().map(|s| s.extracted).sum()
    }

    /// Total errors across all slides
    pub fn total_errors(&self) -> usize {
        self.slides.iter().map(|s| s.errors).sum()
    }
}

/// Drives patch extraction across every slide a source provides
pub struct ExtractionDriver<'a> {
    /// Slide store to extract from
    source: &'a dyn SlideSource,
    /// Run configuration
    config: &'a Config,
    /// Patch geometry, fixed for the run
    geometry: PatchGeometry,
    /// Logger for per-slide status lines
    logger: &'a Logger,
}

impl<'a> ExtractionDriver<'a> {
    /// Create a driver for a slide source and configuration
    pub fn new(source: &'a dyn SlideSource, config: &'a Config, logger: &'a Logger) -> Self {
        let geometry = PatchGeometry::new(
            config.patch_width,
            config.patch_height,
            config.resolution_scale,
        );
        ExtractionDriver {
            source,
            config,
            geometry,
            logger,
        }
    }

    /// Run extraction over every slide
    ///
    /// # Arguments
    /// * `dry_run` - Read regions to validate geometry and I/O but build
    ///   no masks and write no files
    ///
    /// # Returns
    /// Per-slide reports, or the first fatal error. Slides after a fatal
    /// slide are not attempted.
    pub fn run(&self, dry_run: bool) -> ExtractResult<ExtractionReport> {
        fs::create_dir_all(&self.config.patches_dir)?;

        // One existence snapshot for the whole run; files written during
        // the run are intentionally not re-detected
        let existing = self.existing_outputs()?;
        info!(
            "{} existing output file(s) in {}",
            existing.len(),
            self.config.patches_dir.display()
        );

        let slide_ids = self.source.slide_ids()?;
        let progress = ProgressTracker::new(slide_ids.len() as u64, "Extracting patches");

        let mut report = ExtractionReport::default();
        for slide_id in &slide_ids {
            progress.set_message(slide_id);
            let slide_report = self.extract_slide(slide_id, &existing, dry_run)?;
            report.slides.push(slide_report);
            progress.increment(1);
        }
        progress.finish();

        info!(
            "Run complete: {} patches extracted, {} errors across {} slide(s)",
            report.total_extracted(),
            report.total_errors(),
            report.slides.len()
        );
        Ok(report)
    }

    /// Extract all patches for one slide
    fn extract_slide(
        &self,
        slide_id: &str,
        existing: &HashSet<String>,
        dry_run: bool,
    ) -> ExtractResult<SlideReport> {
        info!("Processing slide {}", slide_id);
        let slide = self.source.open(slide_id)?;
        let documents = self.source.annotation_documents(slide_id)?;
        let annotations = parse_documents(documents, self.config.label_policy, &self.geometry)?;

        let batch_id = self.resolve_batch_id(slide_id);
        debug!("Batch id for {}: {:?}", slide_id, batch_id);
        let filenames = build_patch_filenames(slide_id, batch_id.as_deref(), &annotations);

        let mut errors = 0usize;
        for (index, filename) in filenames.iter().enumerate() {
            if existing.contains(filename) {
                debug!("Skipping existing output {}", filename);
                continue;
            }

            let context = read_patch_region(
                slide.as_ref(),
                &annotations,
                &self.geometry,
                self.config.pyramid_level,
                index,
            )?;

            if dry_run {
                continue;
            }

            let mask = match build_ground_truth_mask(
                &context.region,
                &context.class_label,
                self.config.context_mask_radius,
                self.geometry.center,
            ) {
                Ok(mask) => mask,
                Err(ExtractError::InvalidClassLabel(label)) => {
                    warn!(
                        "Skipping point {} of {}: invalid class label {:?}",
                        index, slide_id, label
                    );
                    errors += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let patch = assemble_patch(&context.region, &mask);
            let path = self.config.patches_dir.join(filename);
            patch.save(&path)?;
            debug!("Saved {}", path.display());
        }

        let extracted = filenames.len() - errors;
        let status = format!(
            "{}\tExtracted {} patches.\tErrors {}",
            slide_id, extracted, errors
        );
        info!("{}", status);
        self.logger.log(&status)?;

        Ok(SlideReport {
            slide_id: slide_id.to_string(),
            planned: filenames.len(),
            extracted,
            errors,
        })
    }

    /// Snapshot the PNG files already present in the output directory
    fn existing_outputs(&self) -> ExtractResult<HashSet<String>> {
        let mut existing = HashSet::new();
        for entry in fs::read_dir(&self.config.patches_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.to_lowercase().ends_with(".png") {
                existing.insert(name);
            }
        }
        Ok(existing)
    }

    /// Derive the batch/institute id from the slide's parent directory
    fn resolve_batch_id(&self, slide_id: &str) -> Option<String> {
        let path = self.source.find_slide_path(slide_id)?;
        path.parent()?
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
    }
}
