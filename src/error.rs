//! Error types for report scanning and batch collection.
//!
//! `ScanError` describes why one file's job set could not be extracted and
//! carries no file context; `CollectError` attaches the offending path.
use std::path::PathBuf;

/// The required per-job sections searched for after a job's header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Throughput,
    Latency,
    Cpu,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Section::Throughput => "IOPS/bandwidth",
            Section::Latency => "average latency",
            Section::Cpu => "cpu",
        };
        f.write_str(name)
    }
}

/// Structural failures found while scanning a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The header line has too few `:`-separated segments to hold a timestamp.
    HeaderTooShort {
        job: String,
        segments: usize,
        required: usize,
    },
    /// The file ended before the expected number of job descriptors was seen.
    JobHeadersExhausted { expected: usize, found: usize },
    /// A job named in the descriptor block never got a result header.
    JobHeaderMissing { job: String },
    /// The file ended while a required section was still being searched for.
    SectionMissing { job: String, section: Section },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::HeaderTooShort {
                job,
                segments,
                required,
            } => write!(
                f,
                "job '{job}': header has {segments} segments, at least {required} required"
            ),
            ScanError::JobHeadersExhausted { expected, found } => write!(
                f,
                "file ended after {found} of {expected} job headers"
            ),
            ScanError::JobHeaderMissing { job } => {
                write!(f, "job '{job}': result header not found")
            }
            ScanError::SectionMissing { job, section } => {
                write!(f, "job '{job}': file ended before {section} section")
            }
        }
    }
}

impl std::error::Error for ScanError {}

/// A failure scoped to one input file of a batch.
#[derive(Debug)]
pub enum CollectError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Scan {
        path: PathBuf,
        source: ScanError,
    },
}

impl CollectError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            CollectError::Io { path, .. } | CollectError::Scan { path, .. } => path,
        }
    }
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            CollectError::Scan { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::Io { source, .. } => Some(source),
            CollectError::Scan { source, .. } => Some(source),
        }
    }
}
