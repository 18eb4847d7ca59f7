use napi::Result as NapiResult;
use napi_derive::napi;

use leadgen_pnl_core::history::{history_to_csv, HistoryEntry};
use leadgen_pnl_core::matrix::{run_matrix_scan, GridConfig, MatrixInput};
use leadgen_pnl_core::narrative::build_prompt;
use leadgen_pnl_core::profit::{self, BusinessParameters};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_params(params_json: &str) -> NapiResult<BusinessParameters> {
    serde_json::from_str(params_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Profit model
// ---------------------------------------------------------------------------

/// Bare `ProfitResult` for a parameter set.
#[napi]
pub fn evaluate_profit(params_json: String) -> NapiResult<String> {
    let params = parse_params(&params_json)?;
    serde_json::to_string(&profit::evaluate(&params)).map_err(to_napi_error)
}

/// `ProfitResult` inside the methodology/warnings envelope.
#[napi]
pub fn analyze_profit(params_json: String) -> NapiResult<String> {
    let params = parse_params(&params_json)?;
    serde_json::to_string(&profit::analyze_profit(&params)).map_err(to_napi_error)
}

#[napi]
pub fn default_parameters() -> NapiResult<String> {
    serde_json::to_string(&BusinessParameters::default()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

/// Input is `{"base_params": {...}, "grid": {...}}`; `grid` may be omitted.
#[napi]
pub fn scan_matrix(input_json: String) -> NapiResult<String> {
    let input: MatrixInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    serde_json::to_string(&run_matrix_scan(&input)).map_err(to_napi_error)
}

#[napi]
pub fn default_grid(params_json: String) -> NapiResult<String> {
    let params = parse_params(&params_json)?;
    serde_json::to_string(&GridConfig::centered_on(&params)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Narrative & export
// ---------------------------------------------------------------------------

#[napi]
pub fn build_narrative_prompt(params_json: String) -> NapiResult<String> {
    let params = parse_params(&params_json)?;
    Ok(build_prompt(&profit::evaluate(&params)))
}

/// History entries (JSON array) flattened to CSV text with a UTF-8 BOM.
#[napi]
pub fn export_history_csv(entries_json: String) -> NapiResult<String> {
    let entries: Vec<HistoryEntry> = serde_json::from_str(&entries_json).map_err(to_napi_error)?;
    history_to_csv(&entries).map_err(to_napi_error)
}
