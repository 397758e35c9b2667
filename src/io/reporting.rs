// src/io/reporting.rs

use crate::errors::ReportError;
use crate::metrics::analytics::ScenarioSummary;
use crate::simulation::engine::LogRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the full simulation log as CSV, one row per (period, role), in
/// the log's column order.
pub fn write_simulation_log<P: AsRef<Path>>(
    path: P,
    records: &[LogRecord],
) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes ranked scenario summaries as pretty-printed JSON for downstream
/// tooling.
pub fn write_scenario_summaries<P: AsRef<Path>>(
    path: P,
    summaries: &[ScenarioSummary],
) -> Result<(), ReportError> {
    let mut file = File::create(path)?;
    let json = serde_json::to_string_pretty(summaries)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}
