use crate::cursor::LineCursor;
use crate::error::{ScanError, Section};
use regex::Regex;
use std::sync::LazyLock;

use super::is_cpu_line;

static CPU_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*cpu\s*:\s*usr=(?P<usr>[\d.]*)%?[, ]*sys=(?P<sys>[\d.]*)%?[, ]*ctx=(?P<ctx>[\d.]*)[, ]*majf=(?P<majf>[\d.]*)[, ]*minf=(?P<minf>[\d.]*)[, ]*$",
    )
    .unwrap()
});

/// Fields of a `cpu : usr=X%, sys=Y%, ctx=Z, majf=W, minf=V` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuLine {
    pub usr: String,
    pub sys: String,
    pub ctx: String,
    pub majf: String,
    pub minf: String,
}

impl CpuLine {
    pub fn parse(line: &str) -> Option<Self> {
        let caps = CPU_LINE.captures(line)?;
        Some(Self {
            usr: caps["usr"].to_string(),
            sys: caps["sys"].to_string(),
            ctx: caps["ctx"].to_string(),
            majf: caps["majf"].to_string(),
            minf: caps["minf"].to_string(),
        })
    }

    /// The record's CPU metric: system time with a percent sign.
    pub fn sys_percent(&self) -> String {
        format!("{}%", self.sys)
    }
}

/// Find the job's `cpu :` line. This is the last section of a job.
pub fn extract_cpu(cursor: &mut LineCursor<'_>, job: &str) -> Result<Option<CpuLine>, ScanError> {
    let line = cursor
        .advance_to(is_cpu_line)
        .ok_or_else(|| ScanError::SectionMissing {
            job: job.to_string(),
            section: Section::Cpu,
        })?;
    let parsed = CpuLine::parse(line);
    match &parsed {
        Some(cpu) => tracing::debug!(
            job,
            usr = %cpu.usr,
            sys = %cpu.sys,
            ctx = %cpu.ctx,
            majf = %cpu.majf,
            minf = %cpu.minf,
            "cpu"
        ),
        None => tracing::warn!(
            job,
            line = cursor.line_number(),
            "cpu line did not match expected format"
        ),
    }
    Ok(parsed)
}
