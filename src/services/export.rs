use std::io::Write;

use crate::models::scan::ScanResult;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Write results as CSV with a header row.
///
/// Fields containing commas, quotes, or newlines are wrapped and inner
/// quotes doubled.
pub fn write_csv<W: Write>(mut writer: W, results: &[ScanResult]) -> Result<(), ExportError> {
    writeln!(
        writer,
        "domain,prediction,confidence,method,reason,stage,latency_ms,safelist_tier,created_at"
    )?;

    for result in results {
        writeln!(
            writer,
            "{},{},{:.4},{},{},{},{:.3},{},{}",
            csv_field(&result.domain),
            result.prediction,
            result.confidence,
            csv_field(&result.method),
            csv_field(&result.reason),
            csv_field(result.stage.as_deref().unwrap_or("")),
            result.latency_ms,
            csv_field(result.safelist_tier.as_deref().unwrap_or("")),
            result.created_at.to_rfc3339(),
        )?;
    }

    Ok(())
}

/// Write results as a pretty-printed JSON array.
pub fn write_json<W: Write>(mut writer: W, results: &[ScanResult]) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, results)?;
    writeln!(writer)?;
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
