use super::is_cpu_line;
use crate::cursor::LineCursor;
use crate::probe::CLAT_MARKER;
use crate::record::ClatPercentiles;
use crate::units::LatencyUnit;
use regex::Regex;
use std::sync::LazyLock;

/// A whole table row: optional `|` gutter, then one to four pairs.
static ROW_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s|]*(?:[0-9.]+th=\[\s*[0-9.]+\s*\][,\s]*){1,4}$").unwrap()
});

static PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<percentile>[0-9.]+)th=\[\s*(?P<latency>[0-9.]+)\s*\]").unwrap()
});

/// One `NN.NNth=[ VVV ]` entry, latency still in the table's unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentilePair {
    pub percentile: f64,
    pub latency: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PercentileRow {
    pub pairs: Vec<PercentilePair>,
}

impl PercentileRow {
    pub fn parse(line: &str) -> Option<Self> {
        if !ROW_LINE.is_match(line) {
            return None;
        }
        let pairs = PAIR
            .captures_iter(line)
            .map(|caps| {
                Some(PercentilePair {
                    percentile: caps["percentile"].parse().ok()?,
                    latency: caps["latency"].parse().ok()?,
                })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self { pairs })
    }
}

/// Read the job's percentile table into canonical microseconds.
///
/// The table is optional per job: hitting the cpu line before the
/// `clat percentiles` header yields an empty map and leaves the cpu line
/// in place. At most `rows` lines after the header are read; rows that do
/// not parse are skipped.
pub fn extract_percentiles(cursor: &mut LineCursor<'_>, rows: usize) -> ClatPercentiles {
    let mut table = ClatPercentiles::new();
    let Some(header) =
        cursor.advance_to_before(|l| l.trim().starts_with(CLAT_MARKER), is_cpu_line)
    else {
        tracing::debug!("no clat percentile table for job");
        return table;
    };
    let unit = LatencyUnit::from_header(header);

    for _ in 0..rows {
        match cursor.peek() {
            Some(line) if !is_cpu_line(line) => {
                cursor.next_line();
                let Some(row) = PercentileRow::parse(line) else {
                    tracing::warn!(line = cursor.line_number(), "skipping malformed percentile row");
                    continue;
                };
                for pair in row.pairs {
                    if !table.insert(pair.percentile, unit.to_usec(pair.latency)) {
                        tracing::warn!(
                            percentile = pair.percentile,
                            latency = pair.latency,
                            "percentile entry out of range"
                        );
                    }
                }
            }
            _ => break,
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    const USEC_TABLE: &str = "\
  clat percentiles (usec):
     |  1.00th=[   10],  5.00th=[   11], 10.00th=[   12], 20.00th=[   13],
     | 30.00th=[   14], 40.00th=[   15], 50.00th=[   16], 60.00th=[   17],
     | 70.00th=[   18], 80.00th=[   19], 90.00th=[   21], 95.00th=[   23],
     | 99.00th=[   31], 99.50th=[   38], 99.90th=[   60], 99.95th=[   80],
     | 99.99th=[  135]
  bw (  KiB/s): min= 1
";

    fn msec_equivalent(usec: &str) -> String {
        let header = usec.replace("(usec)", "(msec)");
        PAIR.replace_all(&header, |caps: &regex::Captures| {
            let v: f64 = caps["latency"].parse().unwrap();
            format!("{}th=[{}]", &caps["percentile"], v * 1000.0)
        })
        .into_owned()
    }

    #[test]
    fn row_parses_up_to_four_pairs() {
        let row = PercentileRow::parse("     | 99.00th=[   31], 99.50th=[   38], 99.90th=[   60], 99.95th=[   80],")
            .unwrap();
        assert_eq!(row.pairs.len(), 4);
        assert_eq!(
            row.pairs[2],
            PercentilePair {
                percentile: 99.9,
                latency: 60.0
            }
        );
    }

    #[test]
    fn row_rejects_other_text() {
        assert!(PercentileRow::parse("  bw (  KiB/s): min= 1").is_none());
        assert!(PercentileRow::parse("").is_none());
    }

    #[test]
    fn reads_full_usec_table() {
        let mut cursor = LineCursor::new(USEC_TABLE);
        let table = extract_percentiles(&mut cursor, 5);
        assert_eq!(table.len(), 17);
        assert_eq!(table.get(50.0), Some(16.0));
        assert_eq!(table.get(99.99), Some(135.0));
        assert_eq!(cursor.peek(), Some("  bw (  KiB/s): min= 1"));
    }

    #[test]
    fn msec_table_matches_usec_table() {
        let mut usec_cursor = LineCursor::new(USEC_TABLE);
        let usec = extract_percentiles(&mut usec_cursor, 5);
        let msec_text = msec_equivalent(USEC_TABLE);
        let mut msec_cursor = LineCursor::new(&msec_text);
        let msec = extract_percentiles(&mut msec_cursor, 5);

        assert_eq!(usec.len(), msec.len());
        for ((pa, la), (pb, lb)) in usec.iter().zip(msec.iter()) {
            assert!((pa - pb).abs() < 1e-9);
            assert!((la - lb).abs() < 1e-9);
        }
    }

    #[test]
    fn decimal_msec_latencies() {
        let text = "clat percentiles (msec):\n     |  1.00th=[ 4.5], 50.00th=[ 12.25]\n";
        let mut cursor = LineCursor::new(text);
        let table = extract_percentiles(&mut cursor, 5);
        assert_eq!(table.len(), 2);
        assert!((table.get(1.0).unwrap() - 0.0045).abs() < 1e-9);
        assert!((table.get(50.0).unwrap() - 0.01225).abs() < 1e-9);
    }

    #[test]
    fn malformed_row_skipped() {
        let text = "\
clat percentiles (usec):
     |  1.00th=[   10],  5.00th=[   11]
     | garbage row
     | 99.00th=[   31]
";
        let mut cursor = LineCursor::new(text);
        let table = extract_percentiles(&mut cursor, 3);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(99.0), Some(31.0));
    }

    #[test]
    fn stops_at_cpu_line_without_header() {
        let text = "  bw (KiB/s): min=1\n  cpu : usr=1%, sys=2%, ctx=3, majf=0, minf=1\n";
        let mut cursor = LineCursor::new(text);
        let table = extract_percentiles(&mut cursor, 5);
        assert!(table.is_empty());
        assert!(cursor.peek().unwrap().trim().starts_with("cpu"));
    }

    #[test]
    fn short_table_does_not_eat_cpu_line() {
        let text = "clat percentiles (usec):\n | 50.00th=[ 4]\n  cpu : usr=1%, sys=2%, ctx=3, majf=0, minf=1\n";
        let mut cursor = LineCursor::new(text);
        let table = extract_percentiles(&mut cursor, 5);
        assert_eq!(table.len(), 1);
        assert!(cursor.peek().unwrap().trim().starts_with("cpu"));
    }

    #[test]
    fn serialized_table_reparses_to_same_map() {
        let mut cursor = LineCursor::new(USEC_TABLE);
        let table = extract_percentiles(&mut cursor, 5);
        let text = table.to_report_lines(LatencyUnit::Usec).join("\n");
        let mut again = LineCursor::new(&text);
        assert_eq!(extract_percentiles(&mut again, 5), table);
    }
}
