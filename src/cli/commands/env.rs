//! Env command - print a command's current env

use crate::cli::args::EnvArgs;
use crate::error::HaetaeResult;
use crate::tracker::Tracker;

/// Execute the env command
pub async fn execute(args: EnvArgs, tracker: &Tracker) -> HaetaeResult<()> {
    let env = tracker.invoke_env(&args.name).await?;
    println!("{}", serde_json::to_string_pretty(&env)?);
    Ok(())
}
