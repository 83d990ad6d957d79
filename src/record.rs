//! The per-job result entity and its percentile table.
use crate::units::LatencyUnit;
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A percentile threshold usable as an ordered map key.
#[derive(Debug, Clone, Copy)]
pub struct PercentileKey(f64);

impl PercentileKey {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for PercentileKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PercentileKey {}

impl PartialOrd for PercentileKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PercentileKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Completion-latency percentiles: percentile (0-100) to latency in usec,
/// ascending by percentile. Empty when the report had no percentile table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClatPercentiles {
    entries: BTreeMap<PercentileKey, f64>,
}

impl ClatPercentiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one row, rejecting percentiles outside [0, 100] and negative
    /// or non-finite latencies. A repeated percentile keeps the newest value.
    pub fn insert(&mut self, percentile: f64, latency_usec: f64) -> bool {
        if !(0.0..=100.0).contains(&percentile) || !latency_usec.is_finite() || latency_usec < 0.0
        {
            return false;
        }
        self.entries.insert(PercentileKey(percentile), latency_usec);
        true
    }

    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.entries.get(&PercentileKey(percentile)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.entries.iter().map(|(k, v)| (k.value(), *v))
    }

    /// Write the table back out in the report's own layout: a
    /// `clat percentiles (<unit>):` header followed by rows of up to four
    /// `NNth=[ VVV ]` pairs.
    #[allow(dead_code)]
    pub fn to_report_lines(&self, unit: LatencyUnit) -> Vec<String> {
        let mut lines = vec![format!("  clat percentiles ({}):", unit.token())];
        let pairs: Vec<String> = self
            .iter()
            .map(|(pct, usec)| format!("{pct:>5}th=[{:>6}]", unit.in_unit(usec)))
            .collect();
        let row_count = pairs.chunks(4).len();
        for (i, row) in pairs.chunks(4).enumerate() {
            let sep = if i + 1 == row_count { "" } else { "," };
            lines.push(format!("     | {}{sep}", row.join(", ")));
        }
        lines
    }
}

impl Serialize for ClatPercentiles {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Row {
            percentile: f64,
            latency_usec: f64,
        }

        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for (percentile, latency_usec) in self.iter() {
            seq.serialize_element(&Row {
                percentile,
                latency_usec,
            })?;
        }
        seq.end()
    }
}

/// A finished job record. Built once through `JobDraft::finalize` and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    name: String,
    timestamp: String,
    bandwidth: Option<String>,
    iops: Option<String>,
    average_latency: Option<String>,
    clat_percentiles: ClatPercentiles,
    cpu_usage: Option<String>,
}

impl JobRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn bandwidth(&self) -> Option<&str> {
        self.bandwidth.as_deref()
    }

    pub fn iops(&self) -> Option<&str> {
        self.iops.as_deref()
    }

    pub fn average_latency(&self) -> Option<&str> {
        self.average_latency.as_deref()
    }

    pub fn clat_percentiles(&self) -> &ClatPercentiles {
        &self.clat_percentiles
    }

    pub fn cpu_usage(&self) -> Option<&str> {
        self.cpu_usage.as_deref()
    }
}

/// A job record while its sections are still being filled in.
#[derive(Debug)]
pub struct JobDraft {
    name: String,
    pub timestamp: String,
    pub bandwidth: Option<String>,
    pub iops: Option<String>,
    pub average_latency: Option<String>,
    pub clat_percentiles: ClatPercentiles,
    pub cpu_usage: Option<String>,
}

impl JobDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timestamp: String::new(),
            bandwidth: None,
            iops: None,
            average_latency: None,
            clat_percentiles: ClatPercentiles::new(),
            cpu_usage: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn finalize(self) -> JobRecord {
        JobRecord {
            name: self.name,
            timestamp: self.timestamp,
            bandwidth: self.bandwidth,
            iops: self.iops,
            average_latency: self.average_latency,
            clat_percentiles: self.clat_percentiles,
            cpu_usage: self.cpu_usage,
        }
    }
}
