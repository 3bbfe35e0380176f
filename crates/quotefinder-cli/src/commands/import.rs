//! Import command

use crate::app::{ImportArgs, OutputFormat};
use anyhow::Result;
use quotefinder_core::{import_path, Database};

pub fn run(args: ImportArgs, db: &Database, format: OutputFormat) -> Result<()> {
    let report = import_path(db, &args.path, args.replace)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            if report.replaced > 0 {
                println!("Removed {} existing quotes", report.replaced);
            }
            println!(
                "Imported {} quotes from {} files",
                report.quotes, report.files
            );
        }
    }
    Ok(())
}
