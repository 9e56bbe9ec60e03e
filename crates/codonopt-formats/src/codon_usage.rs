//! Flat text layout of a relative adaptiveness table.
//!
//! ```text
//! Amino Acid: A
//!     GCA: 0.2100
//!     GCC: 0.4000
//!
//! Amino Acid: M
//!     ATG: 1.0000
//! ```
//!
//! One header per amino acid group, indented `CODON: weight` entries, and a
//! blank line between groups. A header must be followed by at least one entry.

use codonopt_core::{AdaptivenessTable, AminoAcid, Codon, CodonTable};
use nom::{
    bytes::complete::{tag, take_while_m_n},
    character::complete::{char, satisfy, space0},
    combinator::all_consuming,
    number::complete::double,
    sequence::{delimited, tuple},
    IResult,
};
use tracing::debug;

use crate::detect::CODON_USAGE_HEADER;
use crate::ParseError;

fn header_line(input: &str) -> IResult<&str, char> {
    all_consuming(delimited(
        tuple((space0, tag(CODON_USAGE_HEADER), space0)),
        satisfy(|c| !c.is_whitespace()),
        space0,
    ))(input)
}

fn entry_line(input: &str) -> IResult<&str, (&str, f64)> {
    let (rest, (_, codon, _, _, _, weight, _)) = all_consuming(tuple((
        space0,
        take_while_m_n(3, 3, |c: char| c.is_ascii_alphabetic()),
        space0,
        char(':'),
        space0,
        double,
        space0,
    )))(input)?;
    Ok((rest, (codon, weight)))
}

/// Parse a saved table. Weights keep the precision they were written with.
pub fn parse(input: &str) -> Result<AdaptivenessTable, ParseError> {
    let code = CodonTable::standard();
    let mut table = AdaptivenessTable::new();
    // (amino acid, header line, entries under it)
    let mut current: Option<(AminoAcid, usize, usize)> = None;
    let mut entries = 0usize;

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        if line.trim_start().starts_with(CODON_USAGE_HEADER) {
            let (_, symbol) = header_line(line)
                .map_err(|_| ParseError::at_line(line_no, "malformed amino acid header"))?;
            let aa = AminoAcid::from_symbol(symbol).ok_or_else(|| {
                ParseError::at_line(line_no, format!("unknown amino acid symbol {symbol:?}"))
            })?;
            if let Some(previous) = current.replace((aa, line_no, 0)) {
                ensure_group_has_entries(previous)?;
            }
            continue;
        }

        let (aa, _, group_entries) = current.as_mut().ok_or_else(|| {
            ParseError::at_line(line_no, "codon entry before any amino acid header")
        })?;
        let aa = *aa;
        *group_entries += 1;
        let (_, (raw_codon, weight)) = entry_line(line)
            .map_err(|_| ParseError::at_line(line_no, "expected `CODON: weight`"))?;
        let codon: Codon = raw_codon
            .parse()
            .map_err(|_| ParseError::at_line(line_no, format!("invalid codon {raw_codon:?}")))?;

        let encoded = code.translate_codon(codon);
        if encoded != aa {
            return Err(ParseError::at_line(
                line_no,
                format!("codon {codon} encodes {encoded}, listed under {aa}"),
            ));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(ParseError::at_line(
                line_no,
                format!("weight {weight} is not a non-negative number"),
            ));
        }
        if table.weight(aa, codon).is_some() {
            return Err(ParseError::at_line(
                line_no,
                format!("codon {codon} listed twice"),
            ));
        }
        table.insert(aa, codon, weight);
        entries += 1;
    }

    if let Some(last) = current {
        ensure_group_has_entries(last)?;
    }

    if table.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No codon entries found in codon usage table".to_string(),
        ));
    }

    debug!(amino_acids = table.len(), entries, "parsed codon usage table");
    Ok(table)
}

fn ensure_group_has_entries(
    (aa, header_line, group_entries): (AminoAcid, usize, usize),
) -> Result<(), ParseError> {
    if group_entries == 0 {
        return Err(ParseError::at_line(
            header_line,
            format!("amino acid {aa} has no codon entries"),
        ));
    }
    Ok(())
}

/// Serialize a table. `precision` fixes the number of decimals; `None`
/// writes the shortest representation that reads back to the same value.
pub fn serialize(table: &AdaptivenessTable, precision: Option<usize>) -> String {
    let mut out = String::new();

    for (aa, codons) in table.iter() {
        out.push_str(&format!("{CODON_USAGE_HEADER} {aa}\n"));
        for (codon, weight) in codons {
            let formatted = match precision {
                Some(p) => format!("{weight:.p$}"),
                None => format!("{weight}"),
            };
            out.push_str(&format!("    {codon}: {formatted}\n"));
        }
        out.push('\n');
    }

    out
}
