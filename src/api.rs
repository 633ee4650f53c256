//! High-level library interface
//!
//! `PatchKit` wires a configuration, a logger and a directory slide
//! source together so library consumers can run extraction or inspect
//! annotations without touching the component layer.

use std::collections::BTreeMap;

use log::info;

use crate::annotation::parser::parse_documents;
use crate::config::Config;
use crate::extractor::driver::{ExtractionDriver, ExtractionReport};
use crate::extractor::geometry::PatchGeometry;
use crate::slide::directory::DirectorySlideSource;
use crate::slide::errors::ExtractResult;
use crate::slide::source::SlideSource;
use crate::utils::logger::Logger;

/// Main interface to the PatchKit library
pub struct PatchKit {
    logger: Logger,
    config: Config,
}

impl PatchKit {
    /// Create a new PatchKit instance
    ///
    /// # Arguments
    /// * `config_path` - Optional path to a TOML config file; the
    ///   compiled-in defaults apply when omitted
    /// * `log_file` - Optional path to log file, defaults to "patchkit.log"
    ///
    /// # Returns
    /// A PatchKit instance or an error if initialization fails
    pub fn new(config_path: Option<&str>, log_file: Option<&str>) -> ExtractResult<Self> {
        let log_path = log_file.unwrap_or("patchkit.log");
        let logger = Logger::new(log_path)?;
        let config = match config_path {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        Ok(PatchKit { logger, config })
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable configuration, for programmatic overrides
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Run patch extraction over every slide under a directory
    ///
    /// # Arguments
    /// * `slides_dir` - Root directory scanned for slide images
    /// * `dry_run` - Validate reads without building masks or writing files
    ///
    /// # Returns
    /// Per-slide extraction reports or the first fatal error
    pub fn extract(&self, slides_dir: &str, dry_run: bool) -> ExtractResult<ExtractionReport> {
        info!("Starting extraction from {}", slides_dir);
        let source = DirectorySlideSource::new(slides_dir);
        let driver = ExtractionDriver::new(&source, &self.config, &self.logger);
        driver.run(dry_run)
    }

    /// Summarize the point annotations of every slide under a directory
    ///
    /// Parses annotation documents without touching pixel data and
    /// formats per-slide, per-class point counts.
    ///
    /// # Returns
    /// A human-readable summary or an error
    pub fn inspect(&self, slides_dir: &str) -> ExtractResult<String> {
        let source = DirectorySlideSource::new(slides_dir);
        let geometry = PatchGeometry::new(
            self.config.patch_width,
            self.config.patch_height,
            self.config.resolution_scale,
        );

        let mut result = String::from("Annotation summary:\n");
        for slide_id in source.slide_ids()? {
            let documents = match source.annotation_documents(&slide_id) {
                Ok(docs) => docs,
                Err(_) => {
                    result.push_str(&format!("  {}: no annotation document\n", slide_id));
                    continue;
                }
            };
            let annotations = parse_documents(documents, self.config.label_policy, &geometry)?;

            let mut per_class: BTreeMap<String, usize> = BTreeMap::new();
            for class in &annotations.patch_classes {
                *per_class.entry(class.clone()).or_insert(0) += 1;
            }

            result.push_str(&format!("  {}: {} point(s)", slide_id, annotations.len()));
            if !per_class.is_empty() {
                let breakdown = per_class
                    .iter()
                    .map(|(class, count)| format!("class {}: {}", class, count))
                    .collect::<Vec<_>>()
                    .join(", ");
                result.push_str(&format!(" ({})", breakdown));
            }
            result.push('\n');
        }
        Ok(result)
    }
}
