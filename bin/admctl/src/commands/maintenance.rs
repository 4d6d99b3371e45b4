use std::path::PathBuf;

use adm_console::maintenance::backfill_file;
use anyhow::{Context, Result};
use clap::Args;

#[derive(Args, Debug)]
pub struct BackfillArgs {
    /// Store document to rewrite
    #[arg(long, default_value = "db.json")]
    path: PathBuf,
}

pub fn execute(args: BackfillArgs) -> Result<()> {
    let report = backfill_file(&args.path)
        .with_context(|| format!("Failed to backfill {}", args.path.display()))?;

    println!(
        "createdAt populated for {} users and {} products ({} generated)",
        report.users, report.products, report.filled
    );

    Ok(())
}
