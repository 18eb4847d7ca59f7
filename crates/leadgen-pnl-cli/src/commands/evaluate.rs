use clap::Args;
use serde_json::Value;

use leadgen_pnl_core::history::DirStore;
use leadgen_pnl_core::profit::analyze_profit;

use super::resolve_parameters;

/// Arguments for a P&L evaluation
#[derive(Args)]
pub struct EvaluateArgs {
    /// Path to a JSON or YAML parameter file (defaults to the stored configuration)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_evaluate(args: EvaluateArgs, store: &DirStore) -> Result<Value, Box<dyn std::error::Error>> {
    let params = resolve_parameters(args.input.as_deref(), store)?;
    let output = analyze_profit(&params);
    Ok(serde_json::to_value(output)?)
}
