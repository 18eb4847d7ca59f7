use clap::{Args, Subcommand};
use serde_json::{json, Value};
use std::fs;

use leadgen_pnl_core::history::store::{load_history, load_parameters, save_history};
use leadgen_pnl_core::history::{history_to_csv, HistoryEntry, KeyValueStore};
use leadgen_pnl_core::profit::evaluate;

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// Snapshot the working configuration and its result
    Save(SaveArgs),
    /// List saved snapshots, oldest first
    List,
    /// Delete one snapshot
    Delete(DeleteArgs),
    /// Delete every snapshot
    Clear,
    /// Export all snapshots as CSV
    Export(ExportArgs),
}

#[derive(Args)]
pub struct SaveArgs {
    /// Optional name for the snapshot
    #[arg(long)]
    pub label: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Snapshot id as shown by `history list`
    #[arg(long)]
    pub id: i64,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(long)]
    pub out: Option<String>,
}

fn summary(entry: &HistoryEntry) -> Value {
    json!({
        "id": entry.id,
        "label": entry.label,
        "timestamp": entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        "avg_cost_per_lead": entry.avg_cost_per_lead,
        "total_daily_leads": entry.total_daily_leads,
        "total_revenue": entry.total_revenue,
        "total_gross_profit": entry.total_gross_profit,
        "total_roi": entry.total_roi,
    })
}

pub fn run_history<S: KeyValueStore>(
    cmd: HistoryCommand,
    store: &mut S,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut log = load_history(&*store);

    match cmd {
        HistoryCommand::Save(args) => {
            let params = load_parameters(&*store);
            let result = evaluate(&params);
            let entry = summary(log.append(args.label, &params, &result));
            save_history(store, &log)?;
            Ok(entry)
        }
        HistoryCommand::List => Ok(Value::Array(log.entries().iter().map(summary).collect())),
        HistoryCommand::Delete(args) => {
            if !log.delete(args.id) {
                return Err(format!("No history entry with id {}", args.id).into());
            }
            save_history(store, &log)?;
            Ok(json!({ "deleted": args.id, "remaining": log.len() }))
        }
        HistoryCommand::Clear => {
            let cleared = log.len();
            log.clear();
            save_history(store, &log)?;
            Ok(json!({ "cleared": cleared }))
        }
        HistoryCommand::Export(args) => {
            let csv = history_to_csv(log.entries())?;
            match args.out {
                Some(path) => {
                    fs::write(&path, csv)?;
                    Ok(json!({ "path": path, "rows": log.len() }))
                }
                None => {
                    print!("{csv}");
                    Ok(Value::Null)
                }
            }
        }
    }
}
