pub mod error;
pub mod types;

#[cfg(feature = "profit")]
pub mod profit;

#[cfg(feature = "matrix")]
pub mod matrix;

#[cfg(feature = "history")]
pub mod history;

#[cfg(feature = "narrative")]
pub mod narrative;

pub use error::LeadGenError;
pub use types::*;

/// Standard result type for all fallible lead-gen operations
pub type LeadGenResult<T> = Result<T, LeadGenError>;
