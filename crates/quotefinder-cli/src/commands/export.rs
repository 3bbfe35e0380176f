//! Export command

use crate::app::{ExportArgs, OutputFormat};
use anyhow::{Context, Result};
use quotefinder_core::export_csv;
use std::fs::File;
use std::io::BufWriter;

pub fn run(args: ExportArgs, format: OutputFormat) -> Result<()> {
    let Some(output) = args.output else {
        // CSV goes to stdout, so no summary
        export_csv(&args.path, std::io::stdout().lock())?;
        return Ok(());
    };

    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let report = export_csv(&args.path, BufWriter::new(file))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Exported {} quotes from {} files to {}",
                report.quotes,
                report.files,
                output.display()
            );
        }
    }
    Ok(())
}
