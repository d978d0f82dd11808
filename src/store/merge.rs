//! Record merging and lookup
//!
//! Merging never touches the input store: the match position is found on the
//! old snapshot first, then a deep copy is updated. A fingerprint error
//! therefore leaves nothing half-done.

use crate::error::HaetaeResult;
use crate::fingerprint::compare_envs;
use crate::store::state::{Record, Store, PACKAGE_VERSION};
use serde::Serialize;
use tracing::debug;

/// What a merge did to the command's record list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// A record with the same env was replaced at this index
    Replaced(usize),
    /// No record matched; the new one was appended at this index
    Appended(usize),
}

/// Merge `record` into a copy of `store` under `command`
///
/// The first record whose env fingerprint-matches is replaced in place;
/// otherwise the record is appended. The copy's version is bumped to the
/// current package version.
pub fn merge_record(
    command: &str,
    store: &Store,
    record: Record,
) -> HaetaeResult<(Store, MergeAction)> {
    let position = match store.commands.get(command) {
        Some(records) => position_of(records, &record.env)?,
        None => None,
    };

    let mut next = store.clone();
    next.version = PACKAGE_VERSION.to_string();
    let records = next.commands.entry(command.to_string()).or_default();

    let action = match position {
        Some(index) => {
            records[index] = record;
            MergeAction::Replaced(index)
        }
        None => {
            records.push(record);
            MergeAction::Appended(records.len() - 1)
        }
    };

    debug!("Merged record for {}: {:?}", command, action);
    Ok((next, action))
}

/// Like [`merge_record`], returning only the new store
pub fn map_store(command: &str, store: &Store, record: Record) -> HaetaeResult<Store> {
    merge_record(command, store, record).map(|(next, _)| next)
}

/// All records of `command`, or `None` if it has never run
pub fn get_records<'a>(command: &str, store: &'a Store) -> Option<&'a [Record]> {
    store.commands.get(command).map(Vec::as_slice)
}

/// First record of `command` whose env fingerprint-matches `env`
pub fn get_record<'a, E>(command: &str, env: &E, store: &'a Store) -> HaetaeResult<Option<&'a Record>>
where
    E: Serialize + ?Sized,
{
    let Some(records) = get_records(command, store) else {
        return Ok(None);
    };
    Ok(position_of(records, env)?.map(|index| &records[index]))
}

fn position_of<E: Serialize + ?Sized>(records: &[Record], env: &E) -> HaetaeResult<Option<usize>> {
    for (index, record) in records.iter().enumerate() {
        if compare_envs(env, &record.env)? {
            return Ok(Some(index));
        }
    }
    Ok(None)
}
