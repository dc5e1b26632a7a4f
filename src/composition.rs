use crate::error::{Result, SeqProbError};
use crate::types::{FrequencyTable, ResidueCounts};

/// Calculates the GC content of a sequence.
///
/// # Arguments
/// * `sequence` - DNA or RNA sequence
///
/// # Returns
/// * `Result<f64>` - Fraction of characters that are G or C (e.g. 0.5 for "ACGT")
///
/// # Errors
/// * Returns `SeqProbError::EmptySequence` if the sequence is empty
pub fn gc_content(sequence: &str) -> Result<f64> {
    let len = sequence.chars().count();
    if len == 0 {
        return Err(SeqProbError::EmptySequence);
    }
    let gc_count = sequence.chars().filter(|&c| c == 'G' || c == 'C').count();
    Ok(gc_count as f64 / len as f64)
}

/// Transcribes a DNA sequence into RNA by replacing every T with U.
///
/// No alphabet validation is performed.
pub fn transcribe(sequence: &str) -> String {
    sequence.replace('T', "U")
}

/// Counts the residues of a DNA or protein sequence.
///
/// Keys are the distinct characters actually present in the sequence, not the full
/// alphabet. No alphabet validation is performed.
pub fn residue_counts(sequence: &str) -> ResidueCounts {
    let mut counts = ResidueCounts::new();
    for residue in sequence.chars() {
        *counts.entry(residue).or_insert(0) += 1;
    }
    counts
}

/// Relative residue frequencies (count / sequence length).
///
/// The result can be passed directly as a background table to the chance
/// probability functions.
///
/// # Errors
/// * Returns `SeqProbError::EmptySequence` if the sequence is empty
pub fn residue_frequencies(sequence: &str) -> Result<FrequencyTable> {
    let counts = residue_counts(sequence);
    let len: usize = counts.values().sum();
    if len == 0 {
        return Err(SeqProbError::EmptySequence);
    }
    Ok(counts
        .into_iter()
        .map(|(residue, count)| (residue, count as f64 / len as f64))
        .collect())
}
