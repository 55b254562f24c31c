//! record-dedup - remove duplicate records from JSON array files
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::process;

use record_dedup::cli::Args;
use record_dedup::processor::{Processor, ProcessorConfig};
use record_dedup::profile::ProfileTable;
use record_dedup::progress::{print_banner, print_error, print_header, print_info, print_success};

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else if !args.quiet && std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    match run(args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            print_error(&format!("{}", e));

            // Print chain of errors
            for cause in e.chain().skip(1) {
                print_error(&format!("  Caused by: {}", cause));
            }

            process::exit(1);
        }
    }
}

/// Returns whether every file was cleaned
fn run(args: Args) -> anyhow::Result<bool> {
    if !args.quiet {
        print_banner();
    }

    let config = ProcessorConfig::from_args(&args)?;

    // Built once here and passed down
    let profiles = match args.profiles {
        Some(ref path) => ProfileTable::load(path)?,
        None => ProfileTable::builtin(),
    };

    let inputs = args.input_paths();

    if !args.quiet && args.verbose {
        print_config(&args, &config, &profiles);
    }

    let processor = Processor::new(config, profiles);
    let report = processor.process(&inputs)?;

    if !args.quiet {
        let message = format!("{}/{} files cleaned successfully", report.succeeded(), report.files.len());
        if report.success() {
            print_success(&message);
        } else {
            print_error(&message);
        }
    }

    Ok(report.success())
}

/// Print configuration summary
fn print_config(args: &Args, config: &ProcessorConfig, profiles: &ProfileTable) {
    print_header("Configuration");

    print_info(&format!("Inputs:       {:?}", args.input_paths()));
    if let Some(ref dir) = config.output_dir {
        print_info(&format!("Output dir:   {:?}", dir));
    }
    match config.explicit_profile {
        Some(ref p) => print_info(&format!("Key field:    {} (display: {})", p.key_field, p.display_field)),
        None => print_info(&format!("Profiles:     {}", profiles.patterns().join(", "))),
    }
    print_info(&format!("Recursive:    {}", config.recursive));
    print_info(&format!("Dry run:      {}", config.dry_run));
}
