//! Environment fingerprint comparison
//!
//! Two envs are the same execution context iff their canonical encodings
//! are byte-equal. The canonical encoding is compact JSON with object keys
//! in insertion order, so `{"a":1,"b":2}` and `{"b":2,"a":1}` are different
//! fingerprints.

use crate::error::{HaetaeError, HaetaeResult};
use serde::Serialize;

/// Canonical string encoding of a JSON-serializable value
///
/// `context` names what is being encoded in the error.
pub fn canonical_form<T: Serialize + ?Sized>(context: &str, value: &T) -> HaetaeResult<String> {
    serde_json::to_string(value).map_err(|e| HaetaeError::serialization(context, e))
}

/// Returns true if both envs have the same canonical encoding
///
/// A value that cannot be serialized is an error, never a mismatch.
pub fn compare_envs<A, B>(one: &A, the_other: &B) -> HaetaeResult<bool>
where
    A: Serialize + ?Sized,
    B: Serialize + ?Sized,
{
    const CONTEXT: &str = "env fingerprint";
    Ok(canonical_form(CONTEXT, one)? == canonical_form(CONTEXT, the_other)?)
}
