use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeadGenError {
    #[error("Unknown business line '{0}' (expected wuchuang, geren or sifa)")]
    UnknownLine(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Missing API key: set {0}")]
    MissingApiKey(String),
}

impl From<serde_json::Error> for LeadGenError {
    fn from(e: serde_json::Error) -> Self {
        LeadGenError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for LeadGenError {
    fn from(e: std::io::Error) -> Self {
        LeadGenError::Storage(e.to_string())
    }
}

#[cfg(feature = "history")]
impl From<csv::Error> for LeadGenError {
    fn from(e: csv::Error) -> Self {
        LeadGenError::Export(e.to_string())
    }
}

#[cfg(feature = "narrative")]
impl From<reqwest::Error> for LeadGenError {
    fn from(e: reqwest::Error) -> Self {
        LeadGenError::Http(e.to_string())
    }
}
