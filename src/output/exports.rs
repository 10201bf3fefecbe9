use anyhow::Result;
use std::io::Write;

use crate::report::Report;

/// Writes `report` as a single JSON document.
pub fn export_json(report: &Report, pretty: bool, output: &mut dyn Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    writeln!(output, "{json}")?;
    Ok(())
}
