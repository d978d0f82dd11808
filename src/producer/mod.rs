//! Run and env producers
//!
//! A producer is the only thing the core knows about a command: something
//! that can be awaited for a JSON value. Implementations:
//! - [`ProcessProducer`]: a shell string or argv array whose stdout is JSON
//! - [`FnProducer`]: an async closure, for library callers
//! - [`EmptyEnv`]: the default env producer, always `{}`

pub mod func;
pub mod process;

pub use func::{EmptyEnv, FnProducer};
pub use process::{Invocation, ProcessProducer};

use crate::error::HaetaeResult;
use async_trait::async_trait;
use serde_json::Value;

/// Something that produces a JSON value for a command
///
/// Producers are awaited without a timeout; one that never resolves stalls
/// the invocation.
#[async_trait]
pub trait Producer: Send + Sync {
    /// Produce the value
    async fn produce(&self) -> HaetaeResult<Value>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}
