use clap::{Arg, ArgAction, Command as ClapCommand};
use log::error;
use std::process;

// Import from your library
use patchkit::commands::{CommandFactory, PatchkitCommandFactory};
use patchkit::utils::logger::Logger;

fn main() {
    let matches = ClapCommand::new("PatchKit")
        .version("0.1")
        .about("Extract annotation-centered patch+mask pairs from whole-slide images")
        .arg(
            Arg::new("input")
                .help("Directory containing slide images and their annotation XML files")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("extract")
                .short('e')
                .long("extract")
                .help("Extract patch+mask pairs")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Read regions but build no masks and write no files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("TOML configuration file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output directory for patches (overrides config)")
                .value_name("DIR")
                .required(false),
        )
        .arg(
            Arg::new("radius")
                .long("radius")
                .help("Ground-truth disk radius in pixels")
                .value_name("PIXELS")
                .required(false),
        )
        .arg(
            Arg::new("patch-size")
                .long("patch-size")
                .help("Output patch size as WIDTHxHEIGHT (e.g. 256x256)")
                .value_name("SIZE")
                .required(false),
        )
        .arg(
            Arg::new("scale")
                .long("scale")
                .help("Resolution scale between read size and output size")
                .value_name("FACTOR")
                .required(false),
        )
        .arg(
            Arg::new("level")
                .long("level")
                .help("Pyramid level to read regions from (0 = native)")
                .value_name("LEVEL")
                .required(false),
        )
        .arg(
            Arg::new("lenient-labels")
                .long("lenient-labels")
                .help("Admit non-numeric class labels at parse time and count them as errors later")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");

    let log_file = "patchkit.log";
    let logger = match Logger::new(log_file) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = Logger::init_global_logger("patchkit-global.log", verbose) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = PatchkitCommandFactory::new();

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
