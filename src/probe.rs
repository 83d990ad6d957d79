/// Marker that opens a completion-latency percentile table.
pub const CLAT_MARKER: &str = "clat percentiles";

/// Decide, once per file, whether any job in it carries a percentile table.
///
/// Whether fio prints percentiles is a property of how the whole run was
/// configured, so the answer applies to every job in the file.
pub fn clat_section_present(text: &str) -> bool {
    text.lines().any(|line| line.contains(CLAT_MARKER))
}
