//! CLI entry-point for percentage-change output.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{info, instrument};

use super::{emit, input, OrderArg};
use crate::{accumulators::PercentageChange, config::Settings, group::Group};

/// Args for the `percentage-change` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// CSV (`key,value`) or JSON records file.
    #[arg(long)]
    pub input: PathBuf,
    /// Only transform the source's top N records.
    #[arg(long)]
    pub top: Option<usize>,
    /// Sort results by percentage change.
    #[arg(long, value_enum, default_value_t = OrderArg::None)]
    pub order: OrderArg,
    /// Sort nested collections only, keeping the top-level order.
    #[arg(long)]
    pub only_nested: bool,
    /// Attach `_debug` traces (defaults to ACCUMULATOR_DEBUG).
    #[arg(long)]
    pub debug: Option<bool>,
    /// Compare this field of composite values instead of the value itself.
    #[arg(long)]
    pub calc_field: Option<String>,
    /// Recurse into the sub-collection stored under this field of each value.
    #[arg(long)]
    pub nested_field: Option<String>,
    /// Write JSON here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: &Settings) -> Result<()> {
    let group = input::load_group(&args.input)?;
    let mut accumulator = PercentageChange::new(group);

    let calc_field = args.calc_field.clone();
    accumulator.set_calculation_accessor(move |value: &Value| match &calc_field {
        Some(field) => value.get(field).and_then(Value::as_f64),
        None => value.as_f64(),
    });
    if let Some(field) = args.nested_field.clone() {
        accumulator.set_iteration_accessor(field.clone(), move |value: &Value| {
            value.get(&field).and_then(Value::as_object).map(|entries| {
                entries
                    .iter()
                    .map(|(key, nested)| (key.clone(), nested.clone()))
                    .collect::<IndexMap<_, _>>()
            })
        });
    }
    accumulator.set_order_by_percentage_change(args.order.into());
    accumulator.set_order_only_nested_values(args.only_nested);
    accumulator.set_debug_mode(args.debug.unwrap_or(settings.debug_trace));

    let results = match args.top {
        Some(n) => accumulator.top(n),
        None => accumulator.all(),
    };
    info!(records = results.len(), "computed percentage changes");
    emit(&results, args.output.as_deref(), settings)
}
