//! Persisted command records
//!
//! One JSON store document per project holds, for every command, the list of
//! environments it ran in and what each run produced:
//!
//! ```json
//! { "version": "0.1.0", "commands": { "build": [ { "time": "...", "env": {}, "durationMs": 120 } ] } }
//! ```
//!
//! Stores are immutable snapshots: [`merge`] builds a new one from an old one,
//! [`repository`] reads and writes them wholesale.

pub mod merge;
pub mod repository;
pub mod state;

pub use merge::{get_record, get_records, map_store, merge_record, MergeAction};
pub use repository::{Fallback, StoreRepository};
pub use state::{now_iso, Record, Store, PACKAGE_VERSION};
