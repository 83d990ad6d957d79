use super::is_lat_line;
use crate::cursor::LineCursor;
use crate::error::{ScanError, Section};
use regex::Regex;
use std::sync::LazyLock;

/// `  write: IOPS=2505, BW=9.79MiB/s (10.3MB/s)(587MiB/60001msec)`
static THROUGHPUT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<label>\w*):\s*IOPS=(?P<iops>[\w.]*),\s*BW=(?P<bw>[\w./]*)\s*\((?P<bw_si>[\w./]*)\)",
    )
    .unwrap()
});

/// Values captured from the IOPS/bandwidth line, kept exactly as printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Throughput {
    pub direction: String,
    pub iops: String,
    pub bandwidth: String,
    pub bandwidth_si: String,
}

impl Throughput {
    pub fn parse(line: &str) -> Option<Self> {
        let caps = THROUGHPUT_LINE.captures(line)?;
        Some(Self {
            direction: caps["label"].to_string(),
            iops: caps["iops"].to_string(),
            bandwidth: caps["bw"].to_string(),
            bandwidth_si: caps["bw_si"].to_string(),
        })
    }
}

/// Find the job's `IOPS=` line.
///
/// Reaching the latency line first means the job printed no throughput:
/// the field stays unset and the latency line is left for the next
/// extractor. Reaching end of file is structural.
pub fn extract_throughput(
    cursor: &mut LineCursor<'_>,
    job: &str,
) -> Result<Option<Throughput>, ScanError> {
    let line = match cursor.advance_to_before(|l| l.contains("IOPS="), is_lat_line) {
        Some(line) => line,
        None if cursor.has_next() => {
            tracing::warn!(job, "no IOPS line before latency section");
            return Ok(None);
        }
        None => {
            return Err(ScanError::SectionMissing {
                job: job.to_string(),
                section: Section::Throughput,
            })
        }
    };

    let parsed = Throughput::parse(line);
    match &parsed {
        Some(t) => tracing::debug!(
            job,
            direction = %t.direction,
            iops = %t.iops,
            bw = %t.bandwidth,
            bw_si = %t.bandwidth_si,
            "throughput"
        ),
        None => tracing::warn!(
            job,
            line = cursor.line_number(),
            "IOPS line did not match expected format"
        ),
    }
    Ok(parsed)
}
