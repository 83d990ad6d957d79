//! Batch collection: drive the per-file, per-job extraction and gather the
//! finished records of every input file, in file order then job order.
use crate::boundary::{is_job_line, scan_job_names};
use crate::config::ParseConfig;
use crate::cursor::LineCursor;
use crate::error::{CollectError, ScanError};
use crate::probe::clat_section_present;
use crate::record::{JobDraft, JobRecord};
use crate::sections;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

/// The inputs of one batch run.
///
/// `declared_count` is the file count given up front alongside the list;
/// the list itself is authoritative when the two disagree.
#[derive(Debug, Clone)]
pub struct InputManifest {
    pub declared_count: usize,
    pub files: Vec<PathBuf>,
}

impl InputManifest {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            declared_count: files.len(),
            files,
        }
    }

    pub fn with_declared_count(declared_count: usize, files: Vec<PathBuf>) -> Self {
        Self {
            declared_count,
            files,
        }
    }
}

/// A file whose contribution to the batch was dropped.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

impl From<&CollectError> for FileFailure {
    fn from(e: &CollectError) -> Self {
        Self {
            path: e.path().to_path_buf(),
            error: e.to_string(),
        }
    }
}

/// Everything a batch run produced, handed to the renderers.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub records: Vec<JobRecord>,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    /// Batch-level caption: the timestamp of the first record.
    pub fn caption(&self) -> Option<&str> {
        self.records.first().map(|r| r.timestamp())
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// State owned by a single batch run. Create one per invocation.
pub struct ParseSession {
    config: ParseConfig,
    records: Vec<JobRecord>,
    failures: Vec<FileFailure>,
}

impl ParseSession {
    pub fn new(config: ParseConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Process every file of the manifest in order. A failing file is
    /// recorded and skipped; the remaining files still run.
    pub fn run(&mut self, manifest: &InputManifest) {
        if manifest.declared_count != manifest.files.len() {
            tracing::warn!(
                declared = manifest.declared_count,
                actual = manifest.files.len(),
                "declared file count does not match input list"
            );
        }
        for path in &manifest.files {
            if let Err(e) = self.collect_file(path) {
                tracing::warn!(error = %e, "dropping file from batch");
                self.failures.push(FileFailure::from(&e));
            }
        }
    }

    /// Read and extract one file, appending its records only on success.
    pub fn collect_file(&mut self, path: &Path) -> Result<usize, CollectError> {
        tracing::info!(file = %path.display(), "scanning report");
        let text = read_report(path).map_err(|e| CollectError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut records = extract_file(&text, &self.config).map_err(|e| CollectError::Scan {
            path: path.to_path_buf(),
            source: e,
        })?;
        let count = records.len();
        self.records.append(&mut records);
        tracing::info!(file = %path.display(), records = count, "report scanned");
        Ok(count)
    }

    #[allow(dead_code)]
    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn finish(self) -> BatchReport {
        BatchReport {
            generated_at: Utc::now(),
            records: self.records,
            failures: self.failures,
        }
    }
}

/// Read a report as text, decompressing `.zst` files.
pub fn read_report(path: &Path) -> std::io::Result<String> {
    let file = std::fs::File::open(path)?;
    let mut text = String::new();
    if path.extension().is_some_and(|ext| ext == "zst") {
        zstd::Decoder::new(file)?.read_to_string(&mut text)?;
    } else {
        std::io::BufReader::new(file).read_to_string(&mut text)?;
    }
    Ok(text)
}

/// Extract every non-skipped job of one report.
///
/// The percentile probe runs over the whole text first. Descriptor lines
/// then fix the job set, and each job's result header starts the section
/// sequence on the shared cursor.
pub fn extract_file(text: &str, config: &ParseConfig) -> Result<Vec<JobRecord>, ScanError> {
    let clat = clat_section_present(text);
    tracing::debug!(clat, "percentile probe");

    let mut cursor = LineCursor::new(text);
    let names = scan_job_names(
        &mut cursor,
        config.jobs_per_file,
        &config.continuation_marker,
    )?;

    let skip = config.skip_prefix.as_str();
    let mut pending: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|name| skip.is_empty() || !name.starts_with(skip))
        .collect();

    let mut records = Vec::with_capacity(pending.len());
    while !pending.is_empty() {
        let Some(line) = cursor.next_line() else {
            return Err(ScanError::JobHeaderMissing {
                job: pending[0].to_string(),
            });
        };
        let Some(idx) = pending.iter().position(|name| is_job_line(line, name)) else {
            continue;
        };
        let name = pending.remove(idx);
        records.push(extract_job(&mut cursor, line, name, clat, config)?);
    }
    Ok(records)
}

/// Run the section extractors for one job, starting at its header line.
fn extract_job(
    cursor: &mut LineCursor<'_>,
    header: &str,
    name: &str,
    clat: bool,
    config: &ParseConfig,
) -> Result<JobRecord, ScanError> {
    let mut draft = JobDraft::new(name);
    draft.timestamp = sections::extract_timestamp(header, name)?;

    if let Some(t) = sections::extract_throughput(cursor, name)? {
        draft.iops = Some(t.iops);
        draft.bandwidth = Some(t.bandwidth);
    }
    draft.average_latency = sections::extract_latency(cursor, name)?;
    if clat {
        draft.clat_percentiles = sections::extract_percentiles(cursor, config.percentile_rows);
    }
    draft.cpu_usage = sections::extract_cpu(cursor, name)?.map(|cpu| cpu.sys_percent());

    tracing::debug!(
        job = %draft.name(),
        percentiles = draft.clat_percentiles.len(),
        "job finalized"
    );
    Ok(draft.finalize())
}
