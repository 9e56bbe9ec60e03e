use crate::FileFormat;

pub(crate) const CODON_USAGE_HEADER: &str = "Amino Acid:";

/// Auto-detect file format from content
pub fn detect_format(content: &str) -> FileFormat {
    let trimmed = content.trim_start();

    if trimmed.starts_with('>') {
        FileFormat::Fasta
    } else if trimmed.starts_with(CODON_USAGE_HEADER) {
        FileFormat::CodonUsage
    } else if trimmed.starts_with('{') {
        FileFormat::Json
    } else if !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
    {
        FileFormat::RawSequence
    } else {
        FileFormat::Unknown
    }
}

/// Upper-cased sequence with every whitespace character removed.
pub(crate) fn strip_whitespace(content: &str) -> String {
    content
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}
