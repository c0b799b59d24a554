//! rpe-load - build a sample database from rpe processed files

use anyhow::Result;
use clap::Parser;
use rpe_common::logging::{init_logging, LogConfig, LogLevel};
use rpe_load::{build_table, pipeline, Cli, Commands, RunArgs};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("rpe-load")
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The loader works without logging, so a failed init is only reported
    let _guard = match init_logging(&log_config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        },
    };

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        },
    }
}

fn execute(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            let config = args.into_config()?;
            let report = pipeline::run(&config)?;

            for table in &report.tables {
                println!("{}: {} rows", table.table, table.rows);
            }
        },
        Commands::Schema { name, layout } => {
            let table = build_table(&name, &layout)?;
            println!("{};", table.create_table_sql());
        },
    }

    Ok(())
}
