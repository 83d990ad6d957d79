use crate::error::ScanError;

/// A header must split into at least this many `:` segments.
pub const TIMESTAMP_SEGMENTS: usize = 7;

/// Rebuild the run timestamp from a job's result header.
///
/// fio ends the header with `pid=N: Mon Jan  1 10:00:00 2024`, so the
/// date lands in `:`-segments 4 to 6 once the line is split.
pub fn extract_timestamp(header: &str, job: &str) -> Result<String, ScanError> {
    let segments: Vec<&str> = header.split(':').collect();
    if segments.len() < TIMESTAMP_SEGMENTS {
        return Err(ScanError::HeaderTooShort {
            job: job.to_string(),
            segments: segments.len(),
            required: TIMESTAMP_SEGMENTS,
        });
    }
    Ok(format!(
        "{}:{}:{}",
        segments[4].trim(),
        segments[5],
        segments[6]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_segments_four_to_six() {
        let header = "write: (groupid=0, jobs=1): err= 0: pid=4242: Mon Jan 1 10:00:00 2024";
        assert_eq!(
            extract_timestamp(header, "write").unwrap(),
            "Mon Jan 1 10:00:00 2024"
        );
    }

    #[test]
    fn test_extra_segments_ignored() {
        let header = "a:b:c:d:e:f:g:h:i";
        assert_eq!(extract_timestamp(header, "a").unwrap(), "e:f:g");
    }

    #[test]
    fn test_short_header_is_error() {
        let err = extract_timestamp("write: (groupid=0): err= 0", "write").unwrap_err();
        assert_eq!(
            err,
            ScanError::HeaderTooShort {
                job: "write".to_string(),
                segments: 3,
                required: 7,
            }
        );
    }

    #[test]
    fn test_generated_headers_round_trip() {
        for (day, time) in [("Tue Mar  5", "08:15:59"), ("Sun Dec 31", "23:59:00")] {
            let (hour, rest) = time.split_once(':').unwrap();
            let header = format!("job: (groupid=1, jobs=4): err= 0: pid=7: {day} {time} 2023");
            let ts = extract_timestamp(&header, "job").unwrap();
            assert_eq!(ts, format!("{day} {hour}:{rest} 2023"));
        }
    }
}
