use crate::codon::CodonTable;

/// Translate a DNA sequence to amino acids using the given codon table.
/// Triplets that are not valid codons become `X`.
pub fn translate(seq: &str, table: &CodonTable) -> String {
    let upper = seq.to_ascii_uppercase();
    upper
        .as_bytes()
        .chunks_exact(3)
        .map(|triplet| {
            table
                .translate_triplet(triplet)
                .map(|aa| aa.symbol())
                .unwrap_or('X')
        })
        .collect()
}

/// Calculate GC content as a fraction (0.0 to 1.0)
pub fn gc_content(seq: &str) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    let gc_count = seq
        .chars()
        .filter(|c| matches!(c.to_ascii_uppercase(), 'G' | 'C'))
        .count();
    gc_count as f64 / seq.len() as f64
}

/// GC content at the third (wobble) position of each complete codon.
pub fn gc3_content(seq: &str) -> f64 {
    let thirds: Vec<u8> = seq
        .as_bytes()
        .chunks_exact(3)
        .map(|c| c[2].to_ascii_uppercase())
        .collect();
    if thirds.is_empty() {
        return 0.0;
    }
    let gc = thirds.iter().filter(|&&b| b == b'G' || b == b'C').count();
    gc as f64 / thirds.len() as f64
}
