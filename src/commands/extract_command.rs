//! Patch extraction command
//!
//! This module implements the command that runs the extraction driver
//! over a directory of slides, including the dry-run mode that validates
//! annotation geometry and region reads without writing anything.

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::annotation::LabelPolicy;
use crate::commands::command_traits::Command;
use crate::config::Config;
use crate::extractor::driver::ExtractionDriver;
use crate::slide::directory::DirectorySlideSource;
use crate::slide::errors::{ExtractError, ExtractResult};
use crate::utils::logger::Logger;

/// Command for extracting annotation patches from slides
pub struct ExtractCommand<'a> {
    /// Root directory containing the slides
    slides_dir: String,
    /// Resolved run configuration, CLI overrides already applied
    config: Config,
    /// Whether to run without building masks or writing files
    dry_run: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> ExtractCommand<'a> {
    /// Create a new extract command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new ExtractCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> ExtractResult<Self> {
        info!("Creating new extract command from arguments");

        let slides_dir = args
            .get_one::<String>("input")
            .ok_or_else(|| ExtractError::GenericError("Missing slides directory".to_string()))?
            .clone();
        info!("Slides directory: {}", slides_dir);

        let config = Self::resolve_config(args)?;
        info!(
            "Patch size: {}x{}, scale: {}, level: {}, radius: {}",
            config.patch_width,
            config.patch_height,
            config.resolution_scale,
            config.pyramid_level,
            config.context_mask_radius
        );
        info!("Output directory: {}", config.patches_dir.display());

        let dry_run = args.get_flag("dry-run");
        info!("Dry-run mode: {}", dry_run);

        Ok(ExtractCommand {
            slides_dir,
            config,
            dry_run,
            logger,
        })
    }

    /// Load the configuration and apply CLI overrides on top
    fn resolve_config(args: &ArgMatches) -> ExtractResult<Config> {
        let mut config = match args.get_one::<String>("config") {
            Some(path) => {
                info!("Loading config file {}", path);
                Config::load(path)?
            }
            None => Config::default(),
        };

        if let Some(output) = args.get_one::<String>("output") {
            config.patches_dir = PathBuf::from(output);
        }
        if let Some(radius) = args.get_one::<String>("radius") {
            config.context_mask_radius = radius.parse::<u32>().map_err(|_| {
                ExtractError::ConfigError(format!("Invalid mask radius: {}", radius))
            })?;
        }
        if let Some(size) = args.get_one::<String>("patch-size") {
            let (width, height) = parse_patch_size(size)?;
            config.patch_width = width;
            config.patch_height = height;
        }
        if let Some(scale) = args.get_one::<String>("scale") {
            config.resolution_scale = scale.parse::<f64>().map_err(|_| {
                ExtractError::ConfigError(format!("Invalid resolution scale: {}", scale))
            })?;
        }
        if let Some(level) = args.get_one::<String>("level") {
            config.pyramid_level = level.parse::<u32>().map_err(|_| {
                ExtractError::ConfigError(format!("Invalid pyramid level: {}", level))
            })?;
        }
        if args.get_flag("lenient-labels") {
            config.label_policy = LabelPolicy::Lenient;
        }
        Ok(config)
    }
}

impl<'a> Command for ExtractCommand<'a> {
    fn execute(&self) -> ExtractResult<()> {
        info!(
            "Executing extract command over {} (dry_run={})",
            self.slides_dir, self.dry_run
        );

        let source = DirectorySlideSource::new(&self.slides_dir);
        let driver = ExtractionDriver::new(&source, &self.config, self.logger);
        let report = driver.run(self.dry_run)?;

        let summary = format!(
            "Processed {} slide(s): {} patches extracted, {} errors",
            report.slides.len(),
            report.total_extracted(),
            report.total_errors()
        );
        info!("{}", summary);
        self.logger.log(&summary)?;
        Ok(())
    }
}

/// Parse a patch size given as `WIDTHxHEIGHT`
fn parse_patch_size(value: &str) -> ExtractResult<(u32, u32)> {
    let parts: Vec<&str> = value.split('x').collect();
    if parts.len() != 2 {
        return Err(ExtractError::ConfigError(format!(
            "Patch size must be WIDTHxHEIGHT, got {}",
            value
        )));
    }
    let width = parts[0]
        .parse::<u32>()
        .map_err(|_| ExtractError::ConfigError(format!("Invalid patch width: {}", parts[0])))?;
    let height = parts[1]
        .parse::<u32>()
        .map_err(|_| ExtractError::ConfigError(format!("Invalid patch height: {}", parts[1])))?;
    Ok((width, height))
}
