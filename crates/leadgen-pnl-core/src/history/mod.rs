pub mod export;
pub mod snapshot;
pub mod store;

pub use export::history_to_csv;
pub use snapshot::{HistoryEntry, HistoryLog};
pub use store::{DirStore, KeyValueStore, MemoryStore};
