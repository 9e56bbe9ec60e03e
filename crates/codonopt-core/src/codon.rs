use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CodonError;

/// A nucleotide triplet over {A, C, G, T}.
///
/// Ordering is alphabetical (A < C < G < T at each position), which is the
/// canonical order used when iterating synonyms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Codon([u8; 3]);

fn base_index(b: u8) -> Option<usize> {
    match b {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

impl Codon {
    /// Build a codon from three bytes, case-insensitively.
    /// Returns `None` for anything other than exactly three of A/C/G/T.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 3 {
            return None;
        }
        let mut upper = [0u8; 3];
        for (slot, b) in upper.iter_mut().zip(bytes) {
            let b = b.to_ascii_uppercase();
            base_index(b)?;
            *slot = b;
        }
        Some(Codon(upper))
    }

    /// Index in [0, 64) with A=0, C=1, G=2, T=3 per position.
    pub fn index(&self) -> usize {
        self.0
            .iter()
            .fold(0, |acc, &b| acc * 4 + base_index(b).unwrap_or(0))
    }

    pub fn from_index(idx: usize) -> Self {
        let idx = idx % 64;
        Codon([BASES[idx >> 4], BASES[(idx >> 2) & 3], BASES[idx & 3]])
    }

    /// All 64 codons in canonical order.
    pub fn all() -> impl Iterator<Item = Codon> {
        (0..64).map(Codon::from_index)
    }

    pub fn as_bytes(&self) -> &[u8; 3] {
        &self.0
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = std::str::from_utf8(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(s)
    }
}

impl FromStr for Codon {
    type Err = CodonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Codon::from_bytes(s.as_bytes()).ok_or_else(|| CodonError::InvalidCodon(s.to_string()))
    }
}

impl TryFrom<String> for Codon {
    type Error = CodonError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Codon> for String {
    fn from(codon: Codon) -> Self {
        codon.to_string()
    }
}

/// One-letter amino acid symbol, or `*` for a stop codon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AminoAcid(u8);

const AMINO_ACID_SYMBOLS: &[u8; 21] = b"*ACDEFGHIKLMNPQRSTVWY";

impl AminoAcid {
    pub const STOP: AminoAcid = AminoAcid(b'*');

    pub fn from_symbol(symbol: char) -> Option<Self> {
        let upper = symbol.to_ascii_uppercase();
        if upper.is_ascii() && AMINO_ACID_SYMBOLS.contains(&(upper as u8)) {
            Some(AminoAcid(upper as u8))
        } else {
            None
        }
    }

    pub fn symbol(&self) -> char {
        char::from(self.0)
    }

    pub fn is_stop(&self) -> bool {
        *self == Self::STOP
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for AminoAcid {
    type Err = CodonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                AminoAcid::from_symbol(c).ok_or_else(|| CodonError::InvalidAminoAcid(s.to_string()))
            }
            _ => Err(CodonError::InvalidAminoAcid(s.to_string())),
        }
    }
}

impl TryFrom<String> for AminoAcid {
    type Error = CodonError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AminoAcid> for String {
    fn from(aa: AminoAcid) -> Self {
        aa.to_string()
    }
}

// Codon order: AAA, AAC, AAG, AAT, ACA, ... TTG, TTT (see `Codon::index`).
const STANDARD_CODE: &[u8; 64] =
    b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF";

static STANDARD: CodonTable = CodonTable {
    name: "Standard",
    id: 1,
    amino_acids: STANDARD_CODE,
};

/// Genetic code lookup table
pub struct CodonTable {
    pub name: &'static str,
    pub id: u8,
    amino_acids: &'static [u8; 64],
}

impl CodonTable {
    /// Standard genetic code (NCBI table 1)
    pub fn standard() -> &'static CodonTable {
        &STANDARD
    }

    /// Translate a single codon to an amino acid
    pub fn translate_codon(&self, codon: Codon) -> AminoAcid {
        AminoAcid(self.amino_acids[codon.index()])
    }

    /// Translate a raw triplet. `None` when the triplet is not a valid codon.
    pub fn translate_triplet(&self, triplet: &[u8]) -> Option<AminoAcid> {
        Codon::from_bytes(triplet).map(|c| self.translate_codon(c))
    }

    pub fn is_stop_codon(&self, codon: Codon) -> bool {
        self.translate_codon(codon).is_stop()
    }

    /// Codons encoding `aa`, in canonical order.
    pub fn synonyms(&self, aa: AminoAcid) -> impl Iterator<Item = Codon> + '_ {
        Codon::all().filter(move |&c| self.translate_codon(c) == aa)
    }
}
