//! One extractor per report section. Each takes the file's shared cursor,
//! advances to the first line its section predicate accepts, and parses it.
//!
//! A section line that is found but does not fit its grammar leaves the
//! field unset. Running out of lines while looking for a required section
//! is a `ScanError::SectionMissing`.
mod cpu;
mod latency;
mod percentiles;
mod throughput;
mod timestamp;

pub use cpu::extract_cpu;
pub use latency::extract_latency;
pub use percentiles::extract_percentiles;
pub use throughput::extract_throughput;
pub use timestamp::extract_timestamp;

pub(crate) fn is_lat_line(line: &str) -> bool {
    line.trim().starts_with("lat")
}

pub(crate) fn is_cpu_line(line: &str) -> bool {
    line.trim().starts_with("cpu")
}
