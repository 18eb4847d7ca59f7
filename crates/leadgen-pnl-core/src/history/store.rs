use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::snapshot::HistoryLog;
use crate::profit::params::BusinessParameters;
use crate::LeadGenResult;

/// Working configuration, rewritten on every change.
pub const CONFIG_KEY: &str = "profit_model_config";
/// User-saved default template used by "restore defaults".
pub const DEFAULT_CONFIG_KEY: &str = "profit_model_default_config";
pub const HISTORY_KEY: &str = "profit_model_history";

/// String key-value persistence. Last write wins.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> LeadGenResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> LeadGenResult<()>;
    fn remove(&mut self, key: &str) -> LeadGenResult<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> LeadGenResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> LeadGenResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> LeadGenResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory, created on first write.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> LeadGenResult<Option<String>> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> LeadGenResult<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> LeadGenResult<()> {
        let path = self.path_for(key);
        if path.is_file() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Read and parse one stored parameter set. Missing, unreadable and
/// malformed values all come back as `None`.
fn read_parameters<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<BusinessParameters> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored configuration");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(params) => Some(params),
        Err(e) => {
            warn!(key, error = %e, "Ignoring malformed stored configuration");
            None
        }
    }
}

/// Working configuration, else the user's default template, else the
/// built-in defaults.
pub fn load_parameters<S: KeyValueStore + ?Sized>(store: &S) -> BusinessParameters {
    if let Some(params) = read_parameters(store, CONFIG_KEY) {
        return params;
    }
    if let Some(params) = read_parameters(store, DEFAULT_CONFIG_KEY) {
        debug!("Using saved default template");
        return params;
    }
    debug!("Using built-in default configuration");
    BusinessParameters::default()
}

pub fn save_parameters<S: KeyValueStore + ?Sized>(
    store: &mut S,
    params: &BusinessParameters,
) -> LeadGenResult<()> {
    store.set(CONFIG_KEY, &serde_json::to_string_pretty(params)?)
}

/// Remember `params` as the template that `restore_defaults` returns to.
pub fn save_default_template<S: KeyValueStore + ?Sized>(
    store: &mut S,
    params: &BusinessParameters,
) -> LeadGenResult<()> {
    store.set(DEFAULT_CONFIG_KEY, &serde_json::to_string_pretty(params)?)
}

/// Replace the working configuration with the user's template, or the
/// built-in defaults when there is no usable template.
pub fn restore_defaults<S: KeyValueStore + ?Sized>(store: &mut S) -> LeadGenResult<BusinessParameters> {
    let params = read_parameters(store, DEFAULT_CONFIG_KEY).unwrap_or_default();
    save_parameters(store, &params)?;
    Ok(params)
}

/// Stored history, or an empty log when nothing usable is stored.
pub fn load_history<S: KeyValueStore + ?Sized>(store: &S) -> HistoryLog {
    let raw = match store.get(HISTORY_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return HistoryLog::new(),
        Err(e) => {
            warn!(error = %e, "Failed to read stored history");
            return HistoryLog::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring malformed stored history");
        HistoryLog::new()
    })
}

pub fn save_history<S: KeyValueStore + ?Sized>(store: &mut S, log: &HistoryLog) -> LeadGenResult<()> {
    store.set(HISTORY_KEY, &serde_json::to_string(log)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profit::model::evaluate;
    use crate::profit::params::BusinessLine;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_store_yields_builtin_defaults() {
        let store = MemoryStore::new();
        assert_eq!(load_parameters(&store), BusinessParameters::default());
        assert!(load_history(&store).is_empty());
    }

    #[test]
    fn test_working_config_wins_over_template() {
        let mut store = MemoryStore::new();
        let template = BusinessParameters::default().with_unit_price(BusinessLine::Geren, dec!(1600));
        let working = BusinessParameters {
            avg_cost_per_lead: dec!(300),
            ..BusinessParameters::default()
        };
        save_default_template(&mut store, &template).unwrap();
        assert_eq!(load_parameters(&store), template);

        save_parameters(&mut store, &working).unwrap();
        assert_eq!(load_parameters(&store), working);
    }

    #[test]
    fn test_malformed_config_falls_back() {
        let mut store = MemoryStore::new();
        store.set(CONFIG_KEY, "{ not json").unwrap();
        assert_eq!(load_parameters(&store), BusinessParameters::default());

        let template = BusinessParameters {
            total_daily_leads: dec!(150),
            ..BusinessParameters::default()
        };
        save_default_template(&mut store, &template).unwrap();
        assert_eq!(load_parameters(&store), template);
    }

    #[test]
    fn test_restore_defaults_prefers_template() {
        let mut store = MemoryStore::new();
        save_parameters(
            &mut store,
            &BusinessParameters {
                avg_cost_per_lead: dec!(999),
                ..BusinessParameters::default()
            },
        )
        .unwrap();
        assert_eq!(restore_defaults(&mut store).unwrap(), BusinessParameters::default());
        assert_eq!(load_parameters(&store), BusinessParameters::default());

        let template = BusinessParameters {
            avg_cost_per_lead: dec!(260),
            ..BusinessParameters::default()
        };
        save_default_template(&mut store, &template).unwrap();
        assert_eq!(restore_defaults(&mut store).unwrap(), template);
        assert_eq!(load_parameters(&store), template);
    }

    #[test]
    fn test_malformed_history_is_empty() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "[{\"id\": \"oops\"}]").unwrap();
        assert!(load_history(&store).is_empty());
    }

    #[test]
    fn test_history_persists() {
        let mut store = MemoryStore::new();
        let params = BusinessParameters::default();
        let mut log = HistoryLog::new();
        log.append(Some("a".into()), &params, &evaluate(&params));
        save_history(&mut store, &log).unwrap();
        assert_eq!(load_history(&store), log);
    }

    #[test]
    fn test_dir_store_round_trip() {
        let root = std::env::temp_dir().join(format!("leadgen-pnl-store-{}", std::process::id()));
        let mut store = DirStore::new(&root);
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        let _ = fs::remove_dir_all(root);
    }
}
