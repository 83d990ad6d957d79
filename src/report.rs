//! Renderers for a finished batch. They only read the collected records;
//! nothing here feeds back into extraction.
use crate::collector::BatchReport;
use crate::record::JobRecord;
use std::fmt::Write;

const UNSET: &str = "-";

pub fn render_json(report: &BatchReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

fn latex_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' | '&' | '_' | '#' | '$' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn latex_row(out: &mut String, label: &str, values: impl Iterator<Item = String>) {
    let cells: Vec<String> = values.collect();
    let _ = writeln!(out, "{label} & {} \\\\ \\hline", cells.join(" & "));
}

/// One column per job: bandwidth, IOPS, latency and cpu rows, captioned
/// with the first job's timestamp.
pub fn render_latex(records: &[JobRecord]) -> String {
    let mut out = String::new();
    let columns = "|l".repeat(records.len() + 1);
    out.push_str("\\begin{table}[H]\n");
    let _ = writeln!(out, "\\begin{{tabular}}{{{columns}|}}");
    out.push_str("\\hline\n");

    latex_row(
        &mut out,
        "\\textbf{device}",
        records
            .iter()
            .map(|r| format!("\\textit{{\\textbf{{{}}}}}", latex_escape(r.name()))),
    );
    let field = move |f: fn(&JobRecord) -> Option<&str>| {
        records
            .iter()
            .map(move |r| latex_escape(f(r).unwrap_or(UNSET)))
    };
    latex_row(&mut out, "bandwidth", field(JobRecord::bandwidth));
    latex_row(&mut out, "IOPS", field(JobRecord::iops));
    latex_row(&mut out, "latency", field(JobRecord::average_latency));
    latex_row(&mut out, "cpu", field(JobRecord::cpu_usage));

    out.push_str("\\end{tabular}\n");
    if let Some(first) = records.first() {
        let _ = writeln!(out, "\\caption{{{}}}", latex_escape(first.timestamp()));
    }
    out.push_str("\\end{table}\n");
    out
}

/// Aligned plain-text table for terminals, followed by any failed files.
/// The `clat p99` column only appears when some job has a percentile table.
pub fn render_summary(report: &BatchReport) -> String {
    let with_clat = report
        .records
        .iter()
        .any(|r| !r.clat_percentiles().is_empty());
    let mut header = vec!["job", "bandwidth", "iops", "latency", "cpu"];
    if with_clat {
        header.push("clat p99");
    }
    let rows: Vec<Vec<String>> = report
        .records
        .iter()
        .map(|r| {
            let mut row = vec![
                r.name().to_string(),
                r.bandwidth().unwrap_or(UNSET).to_string(),
                r.iops().unwrap_or(UNSET).to_string(),
                r.average_latency().unwrap_or(UNSET).to_string(),
                r.cpu_usage().unwrap_or(UNSET).to_string(),
            ];
            if with_clat {
                row.push(
                    r.clat_percentiles()
                        .get(99.0)
                        .map(|v| format!("{v}usec"))
                        .unwrap_or_else(|| UNSET.to_string()),
                );
            }
            row
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    if let Some(caption) = report.caption() {
        let _ = writeln!(out, "{caption}");
    }
    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    let _ = writeln!(out, "{}", line(header));
    for row in &rows {
        let _ = writeln!(out, "{}", line(row.iter().map(String::as_str).collect()));
    }
    for failure in &report.failures {
        let _ = writeln!(out, "FAILED {}", failure.error);
    }
    out
}
