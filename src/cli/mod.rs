//! Command-line interface wiring for group-accumulators.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use crate::{accumulators::PercentageOrder, config::Settings};

pub mod input;
pub mod moving_average;
pub mod percentage_change;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Moving-average and percentage-change over key/value groups",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::PercentageChange(args) => percentage_change::run(args, &settings),
            Commands::MovingAverage(args) => moving_average::run(args, &settings),
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Period-over-period percentage change for every record.
    PercentageChange(percentage_change::Args),
    /// Trailing N-point moving average for every record.
    MovingAverage(moving_average::Args),
}

/// Sort direction for percentage-change output.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OrderArg {
    /// Keep the source order.
    #[default]
    None,
    /// Smallest change first, non-numeric changes before everything.
    Asc,
    /// Largest change first, non-numeric changes after everything.
    Desc,
}

impl From<OrderArg> for PercentageOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::None => PercentageOrder::Unordered,
            OrderArg::Asc => PercentageOrder::Ascending,
            OrderArg::Desc => PercentageOrder::Descending,
        }
    }
}

/// Serialize `records` to stdout, or to `output` resolved against the outputs dir.
pub(crate) fn emit<T: Serialize>(
    records: &T,
    output: Option<&Path>,
    settings: &Settings,
) -> Result<()> {
    let json = if settings.pretty {
        serde_json::to_string_pretty(records)?
    } else {
        serde_json::to_string(records)?
    };
    match output {
        Some(path) => {
            let out_path = settings.join_output(path);
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&out_path, json)
                .with_context(|| format!("writing {}", out_path.display()))?;
            info!(path = %out_path.display(), "wrote results");
        }
        None => println!("{json}"),
    }
    Ok(())
}
