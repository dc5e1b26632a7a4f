use crate::error::{Result, SeqProbError};
use crate::types::FrequencyTable;
use phf::phf_set;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DNA_ALPHABET: [char; 4] = ['A', 'C', 'G', 'T'];
pub const RNA_ALPHABET: [char; 4] = ['A', 'C', 'G', 'U'];
pub const PROTEIN_ALPHABET: [char; 20] = [
    'A', 'R', 'N', 'D', 'C', 'Q', 'E', 'G', 'H', 'I', 'L', 'K', 'M', 'F', 'P', 'S', 'T', 'W', 'Y',
    'V',
];

static DNA_SET: phf::Set<char> = phf_set! { 'A', 'C', 'G', 'T' };
static RNA_SET: phf::Set<char> = phf_set! { 'A', 'C', 'G', 'U' };
static PROTEIN_SET: phf::Set<char> = phf_set! {
    'A', 'R', 'N', 'D', 'C', 'Q', 'E', 'G', 'H', 'I',
    'L', 'K', 'M', 'F', 'P', 'S', 'T', 'W', 'Y', 'V',
};

/// The fixed residue alphabets a sequence can be checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alphabet {
    Dna,
    Rna,
    Protein,
}

impl Alphabet {
    /// Symbols of the alphabet in canonical order
    pub fn symbols(&self) -> &'static [char] {
        match self {
            Alphabet::Dna => &DNA_ALPHABET,
            Alphabet::Rna => &RNA_ALPHABET,
            Alphabet::Protein => &PROTEIN_ALPHABET,
        }
    }

    fn set(&self) -> &'static phf::Set<char> {
        match self {
            Alphabet::Dna => &DNA_SET,
            Alphabet::Rna => &RNA_SET,
            Alphabet::Protein => &PROTEIN_SET,
        }
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.symbols().len()
    }

    /// Human readable name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Alphabet::Dna => "DNA",
            Alphabet::Rna => "RNA",
            Alphabet::Protein => "PROTEIN",
        }
    }

    /// Check whether a character belongs to the alphabet.
    /// Membership is case-sensitive.
    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.set().contains(&c)
    }

    /// Checks that every character of `sequence` belongs to the alphabet.
    ///
    /// # Errors
    /// * Returns `SeqProbError::InvalidAlphabet` for the first character outside the
    ///   alphabet, with its character position
    pub fn validate(&self, sequence: &str) -> Result<()> {
        match sequence
            .chars()
            .enumerate()
            .find(|(_, c)| !self.contains(*c))
        {
            Some((position, residue)) => Err(SeqProbError::invalid_alphabet(
                self.name(),
                residue,
                position,
            )),
            None => Ok(()),
        }
    }

    /// Builds a fresh uniform background table (1/4 for nucleotides, 1/20 for protein)
    pub fn uniform_table(&self) -> FrequencyTable {
        let p = 1.0 / self.len() as f64;
        self.symbols().iter().map(|&c| (c, p)).collect()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
