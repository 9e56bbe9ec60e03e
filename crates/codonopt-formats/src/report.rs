use codonopt_core::{CaiSummary, ScoreReport, ScoreRow};

use crate::ParseError;

pub const SCORE_HEADER: &str = "Codon\tOriginal CAI\tOptimized CAI";

/// Cell written when a gene has no optimized form to score.
pub const UNAVAILABLE: &str = "NA";

/// Tab-separated per-codon scores, one row per codon position.
pub fn serialize_scores(report: &ScoreReport) -> String {
    let mut out = String::with_capacity((report.len() + 1) * 24);
    out.push_str(SCORE_HEADER);
    out.push('\n');
    for row in &report.rows {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            row.position, row.original, row.optimized
        ));
    }
    out
}

/// Score table for a gene that could not be optimized: the original series
/// with every optimized cell set to [`UNAVAILABLE`].
pub fn serialize_original_scores(scores: &[f64]) -> String {
    let mut out = String::with_capacity((scores.len() + 1) * 24);
    out.push_str(SCORE_HEADER);
    out.push('\n');
    for (i, score) in scores.iter().enumerate() {
        out.push_str(&format!("{}\t{score}\t{UNAVAILABLE}\n", i + 1));
    }
    out
}

/// Read rows written by [`serialize_scores`].
pub fn parse_scores(input: &str) -> Result<Vec<ScoreRow>, ParseError> {
    let mut lines = input.lines().enumerate();
    match lines.next() {
        Some((_, header)) if header.trim_end() == SCORE_HEADER => {}
        _ => {
            return Err(ParseError::InvalidFormat(
                "Missing score report header".to_string(),
            ))
        }
    }

    let mut rows = Vec::new();
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 3 {
            return Err(ParseError::at_line(idx + 1, "expected three tab-separated columns"));
        }
        let bad = |what: &str| ParseError::at_line(idx + 1, format!("invalid {what}"));
        rows.push(ScoreRow {
            position: fields[0].trim().parse().map_err(|_| bad("position"))?,
            original: fields[1].trim().parse().map_err(|_| bad("original CAI"))?,
            optimized: fields[2].trim().parse().map_err(|_| bad("optimized CAI"))?,
        });
    }
    Ok(rows)
}

fn summary_line(label: &str, summary: &CaiSummary) -> String {
    let fmt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));
    format!(
        "{label} Sequence CAI: {} (geometric {})",
        fmt(summary.arithmetic),
        fmt(summary.geometric)
    )
}

/// Human summary of both sequences, one line each.
pub fn summary(report: &ScoreReport) -> String {
    format!(
        "{}\n{}",
        summary_line("Original", &report.original),
        summary_line("Optimized", &report.optimized)
    )
}

/// Summary line for the original sequence alone.
pub fn original_summary(scores: &[f64]) -> String {
    summary_line("Original", &CaiSummary::of(scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn report() -> ScoreReport {
        ScoreReport::new(&[1.0, 0.25, 0.0], &[1.0, 0.75, 0.5])
    }

    #[test]
    fn test_serialize_scores() {
        let out = serialize_scores(&report());
        assert_eq!(
            out,
            "Codon\tOriginal CAI\tOptimized CAI\n1\t1\t1\n2\t0.25\t0.75\n3\t0\t0.5\n"
        );
    }

    #[test]
    fn test_parse_scores() {
        let rows = parse_scores(&serialize_scores(&report())).unwrap();
        assert_eq!(rows, report().rows);
        assert!(parse_scores("1\t1\t1\n").is_err());
        assert!(parse_scores("Codon\tOriginal CAI\tOptimized CAI\n1\tx\t1\n").is_err());
    }

    #[test]
    fn test_summary() {
        let text = summary(&report());
        assert!(text.contains("Original Sequence CAI: 0.42 (geometric 0.00)"));
        assert!(text.contains("Optimized Sequence CAI: 0.75"));
    }

    #[test]
    fn test_serialize_original_scores() {
        let out = serialize_original_scores(&[1.0, 0.0, 0.5]);
        assert_eq!(
            out,
            "Codon\tOriginal CAI\tOptimized CAI\n1\t1\tNA\n2\t0\tNA\n3\t0.5\tNA\n"
        );
        assert_eq!(serialize_original_scores(&[]), format!("{SCORE_HEADER}\n"));
    }

    #[test]
    fn test_original_summary() {
        assert_eq!(
            original_summary(&[1.0, 0.0, 0.5]),
            "Original Sequence CAI: 0.50 (geometric 0.00)"
        );
        assert_eq!(original_summary(&[]), "Original Sequence CAI: n/a (geometric n/a)");
    }
}
