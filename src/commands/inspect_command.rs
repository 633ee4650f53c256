//! Annotation inspection command
//!
//! The default command: parses every slide's annotation documents and
//! reports per-class point counts without reading any pixel data. Useful
//! for checking what an extraction run would plan.

use clap::ArgMatches;
use log::info;

use crate::api::PatchKit;
use crate::commands::command_traits::Command;
use crate::slide::errors::{ExtractError, ExtractResult};
use crate::utils::logger::Logger;

/// Command for summarizing point annotations
pub struct InspectCommand<'a> {
    /// Root directory containing the slides
    slides_dir: String,
    /// Optional path to a config file
    config_path: Option<String>,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> InspectCommand<'a> {
    /// Create a new inspect command from CLI arguments
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> ExtractResult<Self> {
        let slides_dir = args
            .get_one::<String>("input")
            .ok_or_else(|| ExtractError::GenericError("Missing slides directory".to_string()))?
            .clone();
        let config_path = args.get_one::<String>("config").cloned();

        Ok(InspectCommand {
            slides_dir,
            config_path,
            logger,
        })
    }
}

impl<'a> Command for InspectCommand<'a> {
    fn execute(&self) -> ExtractResult<()> {
        info!("Inspecting annotations under {}", self.slides_dir);

        let kit = PatchKit::new(self.config_path.as_deref(), None)?;
        let summary = kit.inspect(&self.slides_dir)?;

        print!("{}", summary);
        self.logger.log(&summary)?;
        Ok(())
    }
}
