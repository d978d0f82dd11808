//! In-process memoization for config loads, store reads and env invocations
//!
//! Every cached call is keyed by a canonical JSON encoding of its normalized
//! arguments, so structurally equal calls share an entry regardless of where
//! the arguments came from. Entries live for the process lifetime; the only
//! eviction is the explicit invalidation the store repository performs after
//! each successful save.
//!
//! | Cache | Key | Invalidated |
//! |-------|-----|-------------|
//! | config | canonical config path | never |
//! | store | store path + fallback id | after every save |
//! | env | config path + command | never |

pub mod key;
pub mod memo;

pub use key::CacheKey;
pub use memo::Memo;
