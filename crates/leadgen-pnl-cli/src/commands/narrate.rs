use clap::Args;
use serde_json::Value;
use tracing::info;

use leadgen_pnl_core::history::DirStore;
use leadgen_pnl_core::narrative::{summarize, GeminiClient, NarrativeConfig, RetryPolicy};
use leadgen_pnl_core::profit::evaluate;

use super::resolve_parameters;

/// Arguments for the diagnostic report
#[derive(Args)]
pub struct NarrateArgs {
    /// Path to a JSON or YAML parameter file (defaults to the stored configuration)
    #[arg(long)]
    pub input: Option<String>,

    /// Attempts before giving up
    #[arg(long, default_value_t = 5)]
    pub max_attempts: u32,
}

pub fn run_narrate(args: NarrateArgs, store: &DirStore) -> Result<Value, Box<dyn std::error::Error>> {
    let params = resolve_parameters(args.input.as_deref(), store)?;
    let result = evaluate(&params);

    let config = NarrativeConfig::from_env()?;
    let client = GeminiClient::new(config)?;
    info!(model = client.model(), "Requesting diagnostic report");

    let policy = RetryPolicy {
        max_attempts: args.max_attempts,
        ..RetryPolicy::default()
    };
    let summary = summarize(&client, &result, &policy);
    Ok(serde_json::to_value(summary)?)
}
