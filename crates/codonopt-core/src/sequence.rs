use serde::{Deserialize, Serialize};

/// One record of a reference corpus: an identifier and its coding sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodingSequence {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub sequence: String,
}

impl CodingSequence {
    pub fn new(name: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            sequence: sequence.into().to_uppercase(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Consecutive in-frame triplets from offset 0, trailing fragment dropped.
    pub fn triplets(&self) -> std::slice::ChunksExact<'_, u8> {
        self.sequence.as_bytes().chunks_exact(3)
    }
}
