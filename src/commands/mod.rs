//! CLI command implementations
//!
//! This module contains implementations of the commands supported by the
//! CLI application using the Command pattern.

pub mod command_traits;
pub mod extract_command;
pub mod inspect_command;

pub use command_traits::{Command, CommandFactory};
pub use extract_command::ExtractCommand;
pub use inspect_command::InspectCommand;

use clap::ArgMatches;

use crate::slide::errors::ExtractResult;
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the command-line arguments and creates
/// the appropriate command instance for execution.
pub struct PatchkitCommandFactory;

impl PatchkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        PatchkitCommandFactory
    }
}

impl Default for PatchkitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for PatchkitCommandFactory {
    fn create_command(
        &self,
        args: &ArgMatches,
        logger: &'a Logger,
    ) -> ExtractResult<Box<dyn Command + 'a>> {
        // Extraction (including dry runs) uses the ExtractCommand;
        // everything else defaults to annotation inspection
        if args.get_flag("extract") || args.get_flag("dry-run") {
            Ok(Box::new(ExtractCommand::new(args, logger)?))
        } else {
            Ok(Box::new(InspectCommand::new(args, logger)?))
        }
    }
}
