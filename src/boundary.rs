//! Job boundary scanning: collect the job names declared at the top of a
//! report before any results are read.
use crate::cursor::LineCursor;
use crate::error::ScanError;

/// Name of a job as written at the start of a line, before the first `:`.
pub fn job_name(line: &str) -> &str {
    line.split(':').next().unwrap_or(line)
}

/// Whether `line` opens a section belonging to `name` (`<name>:` prefix).
pub fn is_job_line(line: &str, name: &str) -> bool {
    line.strip_prefix(name)
        .is_some_and(|rest| rest.starts_with(':'))
}

/// Read job descriptor lines from the cursor until `expected` names are known.
///
/// Lines equal to `marker` (fio prints `...` for cloned jobs) and blank
/// lines do not count as jobs, and neither does a repeated name. Names are
/// returned in file order.
pub fn scan_job_names(
    cursor: &mut LineCursor<'_>,
    expected: usize,
    marker: &str,
) -> Result<Vec<String>, ScanError> {
    let mut names = Vec::with_capacity(expected);
    while names.len() < expected {
        let line = cursor.next_line().ok_or(ScanError::JobHeadersExhausted {
            expected,
            found: names.len(),
        })?;
        if line.trim() == marker {
            continue;
        }
        let name = job_name(line).trim_end();
        if name.trim().is_empty() {
            continue;
        }
        if names.iter().any(|known| known == name) {
            tracing::debug!(job = %name, line = cursor.line_number(), "repeated job descriptor");
            continue;
        }
        tracing::debug!(job = %name, line = cursor.line_number(), "job descriptor found");
        names.push(name.to_string());
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_continuation_markers() {
        let text = "...\njob1:x\n...\njob2:y";
        let mut cursor = LineCursor::new(text);
        let names = scan_job_names(&mut cursor, 2, "...").unwrap();
        assert_eq!(names, vec!["job1", "job2"]);
    }

    #[test]
    fn duplicate_names_not_counted() {
        let mut cursor = LineCursor::new("a: (g=0)\na: (g=1)\nb: (g=2)\n");
        let names = scan_job_names(&mut cursor, 2, "...").unwrap();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn duplicates_alone_exhaust_the_file() {
        let mut cursor = LineCursor::new("a: (g=0)\na: (g=1)\n");
        let err = scan_job_names(&mut cursor, 2, "...").unwrap_err();
        assert_eq!(
            err,
            ScanError::JobHeadersExhausted {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn stops_after_expected_count() {
        let text = "seqread: (g=0): rw=read\nseqwrite: (g=1): rw=write\nfio-3.33\n";
        let mut cursor = LineCursor::new(text);
        let names = scan_job_names(&mut cursor, 2, "...").unwrap();
        assert_eq!(names, vec!["seqread", "seqwrite"]);
        assert_eq!(cursor.next_line(), Some("fio-3.33"));
    }

    #[test]
    fn exhausted_file_is_structural_error() {
        let text = "only: (g=0)\n...\n";
        let mut cursor = LineCursor::new(text);
        let err = scan_job_names(&mut cursor, 3, "...").unwrap_err();
        assert_eq!(
            err,
            ScanError::JobHeadersExhausted {
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn zero_jobs_reads_nothing() {
        let mut cursor = LineCursor::new("a: b");
        assert!(scan_job_names(&mut cursor, 0, "...").unwrap().is_empty());
        assert_eq!(cursor.line_number(), 0);
    }

    #[test]
    fn job_line_requires_colon_after_name() {
        assert!(is_job_line("write: (groupid=0, jobs=1): err= 0", "write"));
        assert!(!is_job_line("write2: (groupid=0)", "write"));
        assert!(!is_job_line("  write: IOPS=1", "write"));
    }

    #[test]
    fn name_without_delimiter_is_whole_line() {
        assert_eq!(job_name("warmup"), "warmup");
        assert_eq!(job_name("randrw: (g=0)"), "randrw");
    }
}
