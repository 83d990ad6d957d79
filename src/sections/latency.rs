use super::is_lat_line;
use crate::cursor::LineCursor;
use crate::error::{ScanError, Section};

/// Column range of the unit token in a trimmed `lat (usec): ...` line.
const UNIT_COLUMNS: std::ops::Range<usize> = 5..9;

/// Parse the average from a total-latency line into `<value><unit>`.
pub fn parse_average_latency(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let unit = trimmed.get(UNIT_COLUMNS)?;
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    let avg = compact
        .split(',')
        .find_map(|field| field.strip_prefix("avg="))?;
    let value = avg.strip_suffix(|c: char| c.is_ascii_alphabetic()).unwrap_or(avg);
    value.parse::<f64>().ok()?;
    Some(format!("{value}{unit}"))
}

/// Find the job's total-latency line (`lat (<unit>): min=..., avg=...`).
pub fn extract_latency(cursor: &mut LineCursor<'_>, job: &str) -> Result<Option<String>, ScanError> {
    let line = cursor
        .advance_to(is_lat_line)
        .ok_or_else(|| ScanError::SectionMissing {
            job: job.to_string(),
            section: Section::Latency,
        })?;
    let parsed = parse_average_latency(line);
    match &parsed {
        Some(avg) => tracing::debug!(job, avg = %avg, "average latency"),
        None => tracing::warn!(job, line = cursor.line_number(), "latency line has no usable avg field"),
    }
    Ok(parsed)
}
