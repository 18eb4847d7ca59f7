use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use leadgen_pnl_core::history::DirStore;
use leadgen_pnl_core::matrix::{run_matrix_scan, GridConfig, MatrixInput};

use super::resolve_parameters;
use crate::input;

/// Arguments for a break-even matrix scan
#[derive(Args)]
pub struct MatrixArgs {
    /// Path to a JSON or YAML parameter file (defaults to the stored configuration)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON or YAML grid file (defaults to +/-50 around the current cost and volume)
    #[arg(long)]
    pub grid: Option<String>,

    /// Lowest blended cost per lead
    #[arg(long)]
    pub cost_min: Option<Decimal>,

    /// Highest blended cost per lead
    #[arg(long)]
    pub cost_max: Option<Decimal>,

    /// Lowest daily lead volume
    #[arg(long)]
    pub leads_min: Option<Decimal>,

    /// Highest daily lead volume
    #[arg(long)]
    pub leads_max: Option<Decimal>,

    /// Force the fixed floor lab cost on the per-deal lines
    #[arg(long)]
    pub floor_lab_cost: bool,

    /// Flat overhead deducted from every cell
    #[arg(long)]
    pub group_cost_share: Option<Decimal>,
}

pub fn run_matrix(args: MatrixArgs, store: &DirStore) -> Result<Value, Box<dyn std::error::Error>> {
    let base_params = resolve_parameters(args.input.as_deref(), store)?;

    let mut grid: GridConfig = match args.grid {
        Some(ref path) => input::file::read_input(path)?,
        None => GridConfig::centered_on(&base_params),
    };
    if let Some(v) = args.cost_min {
        grid.cost_min = v;
    }
    if let Some(v) = args.cost_max {
        grid.cost_max = v;
    }
    if let Some(v) = args.leads_min {
        grid.leads_min = v;
    }
    if let Some(v) = args.leads_max {
        grid.leads_max = v;
    }
    if args.floor_lab_cost {
        grid.use_floor_lab_cost = true;
    }
    if let Some(v) = args.group_cost_share {
        grid.group_cost_share = v;
    }

    let output = run_matrix_scan(&MatrixInput {
        base_params,
        grid: Some(grid),
    });
    Ok(serde_json::to_value(output)?)
}
