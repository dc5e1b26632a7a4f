use crate::alphabet::Alphabet;
use crate::error::{Result, SeqProbError};
use crate::types::FrequencyTable;

/// Allowed deviation of a background table's total from 1
pub const DEFAULT_SUM_TOLERANCE: f64 = 1e-6;

/// Checks that `table` is a well-formed background model for `alphabet`.
///
/// A table may cover only part of the alphabet (a table built from the residue
/// frequencies of a short sequence usually does), but every key it carries must be
/// a member, every value must be a probability and the values must sum to 1.
///
/// # Errors
/// * Returns `SeqProbError::InvalidFrequencyTable` on a foreign symbol, a value
///   outside [0, 1] or a total further than `tolerance` from 1
pub fn validate_background(table: &FrequencyTable, alphabet: Alphabet, tolerance: f64) -> Result<()> {
    let mut total = 0.0;
    for (&symbol, &p) in table {
        if !alphabet.contains(symbol) {
            return Err(SeqProbError::invalid_table(format!(
                "symbol '{}' is not part of the {} alphabet",
                symbol, alphabet
            )));
        }
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(SeqProbError::invalid_table(format!(
                "probability of '{}' is {}, expected a value in [0, 1]",
                symbol, p
            )));
        }
        total += p;
    }

    if (total - 1.0).abs() > tolerance {
        return Err(SeqProbError::invalid_table(format!(
            "probabilities sum to {}, expected 1 (tolerance {})",
            total, tolerance
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::residue_frequencies;

    #[test]
    fn test_uniform_tables_are_valid() {
        for alphabet in [Alphabet::Dna, Alphabet::Rna, Alphabet::Protein] {
            let table = alphabet.uniform_table();
            assert!(validate_background(&table, alphabet, DEFAULT_SUM_TOLERANCE).is_ok());
        }
    }

    #[test]
    fn test_partial_table_from_frequencies() {
        let table = residue_frequencies("CCCCCCGATAT").unwrap();
        assert!(validate_background(&table, Alphabet::Dna, DEFAULT_SUM_TOLERANCE).is_ok());
    }

    #[test]
    fn test_rejects_malformed_tables() {
        let foreign = FrequencyTable::from([('A', 0.5), ('U', 0.5)]);
        assert!(validate_background(&foreign, Alphabet::Dna, DEFAULT_SUM_TOLERANCE).is_err());

        let negative = FrequencyTable::from([('A', 1.5), ('C', -0.5)]);
        assert!(validate_background(&negative, Alphabet::Dna, DEFAULT_SUM_TOLERANCE).is_err());

        let nan = FrequencyTable::from([('A', f64::NAN)]);
        assert!(validate_background(&nan, Alphabet::Dna, DEFAULT_SUM_TOLERANCE).is_err());

        let short = FrequencyTable::from([('A', 0.25), ('C', 0.25)]);
        assert!(validate_background(&short, Alphabet::Dna, DEFAULT_SUM_TOLERANCE).is_err());
        assert!(validate_background(&short, Alphabet::Dna, 0.5).is_ok());

        assert!(validate_background(&FrequencyTable::new(), Alphabet::Dna, DEFAULT_SUM_TOLERANCE).is_err());
    }
}
