//! Command-line interface entry point for `gradebook`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use gradebook_analytics::config::Config;
use gradebook_analytics::info;
use gradebook_analytics::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};

fn main() {
    let args = Cli::parse();

    // The stored config is what `config set/unset` persists; CLI overrides
    // only ever touch the per-run copy
    let mut stored = Config::load();
    let defaults = Config::from_defaults();
    let mut config = stored.clone();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| Level::parse(&config.logging.level))
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // CLI flag wins, otherwise config logging.file if set
    let config_log_path = config.logging.file_path();

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let outcome = match &args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand.clone(), &mut stored, &defaults)
        }
        Command::Activities { course_id } => commands::activities::run(course_id, &config),
        Command::Analyze { source } => commands::analyze::run(source, &config),
        Command::Report {
            source,
            format,
            output,
            no_chart,
        } => commands::report::run(
            &commands::report::ReportArgs {
                source,
                format: format.as_deref(),
                output: output.as_deref(),
                no_chart: *no_chart,
            },
            &config,
        ),
        Command::Export { source, output } => {
            commands::export::run(source, output.as_deref(), &config)
        }
    };

    if let Err(message) = outcome {
        eprintln!("{message}");
        std::process::exit(1);
    }
}
