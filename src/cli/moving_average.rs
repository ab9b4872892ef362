//! CLI entry-point for moving-average output.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use super::{emit, input};
use crate::{accumulators::MovingAverage, config::Settings, group::Group};

/// Args for the `moving-average` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// CSV (`key,value`) or JSON records file.
    #[arg(long)]
    pub input: PathBuf,
    /// Number of points per average (defaults to ACCUMULATOR_WINDOW).
    #[arg(long)]
    pub window: Option<usize>,
    /// Only use the source's top N records; reports running totals unless --averaged-top.
    #[arg(long)]
    pub top: Option<usize>,
    /// Average the top N records instead of reporting running totals.
    #[arg(long, requires = "top")]
    pub averaged_top: bool,
    /// Write JSON here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: &Settings) -> Result<()> {
    let group = input::load_group(&args.input)?;
    let window = args.window.unwrap_or(settings.default_window);
    let accumulator = MovingAverage::new(group, window);

    let results = match (args.top, args.averaged_top) {
        (Some(n), true) => accumulator.top_averaged(n),
        (Some(n), false) => accumulator.top(n),
        (None, _) => accumulator.all(),
    };
    info!(records = results.len(), window, "computed moving averages");
    emit(&results, args.output.as_deref(), settings)
}
