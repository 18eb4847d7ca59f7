pub mod config;
pub mod evaluate;
pub mod history;
pub mod matrix;
pub mod narrate;

use leadgen_pnl_core::history::store::load_parameters;
use leadgen_pnl_core::history::KeyValueStore;
use leadgen_pnl_core::profit::BusinessParameters;

use crate::input;

/// Parameters from `--input`, else piped stdin, else the stored working
/// configuration.
pub fn resolve_parameters<S: KeyValueStore>(
    input_path: Option<&str>,
    store: &S,
) -> Result<BusinessParameters, Box<dyn std::error::Error>> {
    if let Some(path) = input_path {
        return input::file::read_input(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    Ok(load_parameters(store))
}
