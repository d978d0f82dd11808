//! Records command - print stored records as JSON

use crate::cli::args::RecordsArgs;
use crate::error::HaetaeResult;
use crate::store::{Record, Store};
use crate::tracker::Tracker;
use serde_json::Value;
use std::path::Path;

/// Execute the records command
pub async fn execute(
    args: RecordsArgs,
    tracker: &Tracker,
    store_file: Option<&Path>,
) -> HaetaeResult<()> {
    let store = tracker.load_store(store_file).await?;

    let output = match args.name {
        None => serde_json::to_value(&*store)?,
        Some(ref name) if args.current => {
            tracker.config().command(name)?;
            let record = tracker.record(name, None, &store).await?;
            record_value(record.as_ref(), args.data)?
        }
        Some(ref name) => records_value(tracker, name, &store, args.data)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn records_value(tracker: &Tracker, name: &str, store: &Store, data: bool) -> HaetaeResult<Value> {
    let Some(records) = tracker.records(name, store) else {
        return Ok(Value::Null);
    };
    if data {
        Ok(Value::Array(
            records
                .iter()
                .map(|r| Value::Object(r.data.clone()))
                .collect(),
        ))
    } else {
        Ok(serde_json::to_value(records)?)
    }
}

fn record_value(record: Option<&Record>, data: bool) -> HaetaeResult<Value> {
    match record {
        None => Ok(Value::Null),
        Some(record) if data => Ok(Value::Object(record.data.clone())),
        Some(record) => Ok(serde_json::to_value(record)?),
    }
}
