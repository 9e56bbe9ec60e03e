use codonopt_core::CodingSequence;
use tracing::debug;

use crate::ParseError;

/// Parse a FASTA format string into corpus records
pub fn parse(input: &str) -> Result<Vec<CodingSequence>, ParseError> {
    let mut records = Vec::new();
    let mut current_name: Option<String> = None;
    let mut current_desc: Option<String> = None;
    let mut current_seq = String::new();

    for line in input.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        if let Some(header) = trimmed.strip_prefix('>') {
            if let Some(name) = current_name.take() {
                push_record(
                    &mut records,
                    name,
                    current_desc.take(),
                    std::mem::take(&mut current_seq),
                );
            }

            let mut parts = header.splitn(2, char::is_whitespace);
            current_name = Some(parts.next().unwrap_or_default().to_string());
            current_desc = parts.next().map(|s| s.trim().to_string());
            current_seq = String::new();
        } else if trimmed.starts_with(';') {
            // Comment line, skip
            continue;
        } else {
            current_seq.extend(
                trimmed
                    .chars()
                    .filter(|c| c.is_ascii_alphabetic())
                    .map(|c| c.to_ascii_uppercase()),
            );
        }
    }

    if let Some(name) = current_name {
        push_record(&mut records, name, current_desc, current_seq);
    }

    if records.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in FASTA input".to_string(),
        ));
    }

    debug!(records = records.len(), "parsed FASTA");
    Ok(records)
}

fn push_record(
    records: &mut Vec<CodingSequence>,
    name: String,
    description: Option<String>,
    sequence: String,
) {
    // Headers without sequence lines are dropped
    if sequence.is_empty() {
        return;
    }
    let mut record = CodingSequence::new(name, sequence);
    if let Some(desc) = description {
        record.description = desc;
    }
    records.push(record);
}

/// Serialize records to FASTA format
pub fn serialize(records: &[CodingSequence]) -> String {
    let mut out = String::new();

    for record in records {
        out.push('>');
        out.push_str(&record.name);
        if !record.description.is_empty() {
            out.push(' ');
            out.push_str(&record.description);
        }
        out.push('\n');

        // Sequence in 80-character lines
        for chunk in record.sequence.as_bytes().chunks(80) {
            out.push_str(&String::from_utf8_lossy(chunk));
            out.push('\n');
        }
    }

    out
}
