//! Canonical cache keys
//!
//! Arguments are encoded with the same canonical JSON form used for env
//! fingerprints, then hashed so keys stay short no matter how large the
//! arguments are.

use crate::error::HaetaeResult;
use crate::fingerprint::canonical_form;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Key derived from a scope name and a canonical argument encoding
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key for `args` within `scope`
    ///
    /// Fails with a serialization error if `args` has no canonical form.
    pub fn new<T: Serialize + ?Sized>(scope: &str, args: &T) -> HaetaeResult<Self> {
        let canonical = canonical_form(&format!("{} cache key", scope), args)?;

        let mut hasher = Sha256::new();
        hasher.update(scope.as_bytes());
        hasher.update([0u8]);
        hasher.update(canonical.as_bytes());
        let digest = hasher.finalize();

        // 16 bytes is plenty for an in-process map
        Ok(Self(format!("{}:{}", scope, hex::encode(&digest[..16]))))
    }

}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
