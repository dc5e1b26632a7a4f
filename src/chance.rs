//! Chance-similarity probabilities.
//!
//! Estimates how likely it is that a second sequence, drawn residue by residue from a
//! background model, matches a given sequence in a given fraction of its positions by
//! chance alone. Every position is treated as an independent trial; no alignment or
//! Markov structure is modelled.

use crate::alphabet::Alphabet;
use crate::background::{validate_background, DEFAULT_SUM_TOLERANCE};
use crate::composition::residue_counts;
use crate::error::{Result, SeqProbError};
use crate::types::{FrequencyTable, ResidueCounts};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use statrs::function::factorial::ln_binomial;

/// Spacing of the similarity grid summed by the at-least probability
pub const SIMILARITY_STEP: f64 = 0.05;

/// Guard subtracted before rounding the grid size up, so that representation error in
/// `(1 - min) / step` does not add a point at 1.0
pub const GRID_EPSILON: f64 = 1e-9;

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(SeqProbError::out_of_range(
            name,
            value,
            "expected a fraction in [0, 1]",
        ));
    }
    Ok(())
}

/// Similarity values summed by the at-least probability.
///
/// The grid starts at `min_similarity` and advances in steps of [`SIMILARITY_STEP`]
/// while strictly below 1. It is anchored at the minimum, so `0.52` yields
/// `0.52, 0.57, ..., 0.97`, and `1.0` yields an empty grid.
///
/// # Errors
/// * Returns `SeqProbError::OutOfRangeParameter` if `min_similarity` is not in [0, 1]
pub fn similarity_grid(min_similarity: f64) -> Result<Vec<f64>> {
    check_fraction("min_similarity", min_similarity)?;
    let points = ((1.0 - min_similarity) / SIMILARITY_STEP - GRID_EPSILON)
        .ceil()
        .max(0.0) as usize;
    Ok((0..points)
        .map(|i| min_similarity + i as f64 * SIMILARITY_STEP)
        .collect())
}

/// A background model bound to an alphabet.
///
/// The same model serves DNA, RNA and protein sequences; only the alphabet used for
/// validation and the default uniform table differ. A model is immutable once built
/// and can be shared across threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChanceModelConfig")]
pub struct ChanceModel {
    alphabet: Alphabet,
    background: FrequencyTable,
    sum_tolerance: f64,
}

/// Deserialized form of a [`ChanceModel`], validated on conversion
#[derive(Deserialize)]
struct ChanceModelConfig {
    alphabet: Alphabet,
    #[serde(default)]
    background: Option<FrequencyTable>,
    #[serde(default = "default_sum_tolerance")]
    sum_tolerance: f64,
}

fn default_sum_tolerance() -> f64 {
    DEFAULT_SUM_TOLERANCE
}

impl TryFrom<ChanceModelConfig> for ChanceModel {
    type Error = SeqProbError;

    fn try_from(config: ChanceModelConfig) -> Result<Self> {
        let model = ChanceModel::new(config.alphabet).with_sum_tolerance(config.sum_tolerance)?;
        match config.background {
            Some(table) => model.with_background(table),
            None => Ok(model),
        }
    }
}

impl ChanceModel {
    /// Model with the uniform background of `alphabet`
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            background: alphabet.uniform_table(),
            sum_tolerance: DEFAULT_SUM_TOLERANCE,
        }
    }

    pub fn dna() -> Self {
        Self::new(Alphabet::Dna)
    }

    pub fn rna() -> Self {
        Self::new(Alphabet::Rna)
    }

    pub fn protein() -> Self {
        Self::new(Alphabet::Protein)
    }

    /// Replaces the background table.
    ///
    /// # Errors
    /// * Returns `SeqProbError::InvalidFrequencyTable` if the table carries foreign
    ///   symbols, values outside [0, 1], or does not sum to 1
    pub fn with_background(mut self, background: FrequencyTable) -> Result<Self> {
        validate_background(&background, self.alphabet, self.sum_tolerance)?;
        self.background = background;
        Ok(self)
    }

    /// Sets how far a background total may drift from 1.
    ///
    /// The current background is re-checked against the new tolerance.
    pub fn with_sum_tolerance(mut self, tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(SeqProbError::out_of_range(
                "sum_tolerance",
                tolerance,
                "expected a finite non-negative value",
            ));
        }
        validate_background(&self.background, self.alphabet, tolerance)?;
        self.sum_tolerance = tolerance;
        Ok(self)
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn background(&self) -> &FrequencyTable {
        &self.background
    }

    pub fn sum_tolerance(&self) -> f64 {
        self.sum_tolerance
    }

    /// Probability that a random sequence matches `sequence` in exactly the fraction
    /// `similarity` of positions and differs elsewhere.
    ///
    /// With n = len(sequence) and k = n * similarity (rounded half to even), the result is
    /// C(n, k) times, for each background symbol s with count c(s) and probability p(s),
    /// p(s)^(c(s) * similarity) * (1 - p(s))^(c(s) * (1 - similarity)).
    ///
    /// # Errors
    /// * `SeqProbError::OutOfRangeParameter` if `similarity` is not in [0, 1]
    /// * `SeqProbError::InvalidAlphabet` if `sequence` is not a sequence of this alphabet
    pub fn probability(&self, sequence: &str, similarity: f64) -> Result<f64> {
        check_fraction("similarity", similarity)?;
        let (counts, n) = self.prepare(sequence)?;
        let probability = self.exact(&counts, n, similarity);
        debug!(
            "{} chance probability: n = {}, similarity = {}, p = {:e}",
            self.alphabet, n, similarity, probability
        );
        Ok(probability)
    }

    /// Probability of sharing at least `min_similarity` of positions by chance,
    /// approximated by summing [`ChanceModel::probability`] over [`similarity_grid`].
    /// The sum is capped at 1: on sequences shorter than the grid several points
    /// round to the same number of matches and are counted more than once.
    ///
    /// # Errors
    /// * `SeqProbError::OutOfRangeParameter` if `min_similarity` is not in [0, 1]
    /// * `SeqProbError::InvalidAlphabet` if `sequence` is not a sequence of this alphabet
    pub fn min_probability(&self, sequence: &str, min_similarity: f64) -> Result<f64> {
        let grid = similarity_grid(min_similarity)?;
        let (counts, n) = self.prepare(sequence)?;

        let total: f64 = grid
            .iter()
            .map(|&similarity| {
                let term = self.exact(&counts, n, similarity);
                trace!("similarity {:.2}: {:e}", similarity, term);
                term
            })
            .sum();
        // overlapping grid terms can overshoot on very short sequences
        let total = total.min(1.0);
        debug!(
            "{} minimum chance probability: n = {}, min_similarity = {}, {} grid points, p = {:e}",
            self.alphabet,
            n,
            min_similarity,
            grid.len(),
            total
        );
        Ok(total)
    }

    fn prepare(&self, sequence: &str) -> Result<(ResidueCounts, usize)> {
        self.alphabet.validate(sequence)?;
        let counts = residue_counts(sequence);
        let n: usize = counts.values().sum();

        let missing: Vec<char> = counts
            .keys()
            .filter(|c| !self.background.contains_key(*c))
            .copied()
            .collect();
        if !missing.is_empty() {
            warn!(
                "residues {:?} have no background probability and contribute no factor",
                missing
            );
        }

        Ok((counts, n))
    }

    /// Evaluated in log space; C(n, k) alone overflows an f64 past n of about 1030.
    fn exact(&self, counts: &ResidueCounts, n: usize, similarity: f64) -> f64 {
        let k = (n as f64 * similarity).round_ties_even() as u64;
        let ln_placements = ln_binomial(n as u64, k);

        self.background
            .iter()
            .fold(ln_placements, |acc, (symbol, &p)| {
                let c = counts.get(symbol).copied().unwrap_or(0) as f64;
                acc + ln_power(p, c * similarity) + ln_power(1.0 - p, c * (1.0 - similarity))
            })
            .exp()
    }
}

/// ln(base^exponent) with 0^0 = 1
fn ln_power(base: f64, exponent: f64) -> f64 {
    if exponent == 0.0 {
        0.0
    } else {
        exponent * base.ln()
    }
}

fn model_for(alphabet: Alphabet, background: Option<&FrequencyTable>) -> Result<ChanceModel> {
    let model = ChanceModel::new(alphabet);
    match background {
        Some(table) => model.with_background(table.clone()),
        None => Ok(model),
    }
}

/// Exact-similarity chance probability of `sequence` under `background`, or the
/// uniform table of `alphabet` when no background is given.
///
/// See [`ChanceModel::probability`].
pub fn chance_probability(
    alphabet: Alphabet,
    sequence: &str,
    similarity: f64,
    background: Option<&FrequencyTable>,
) -> Result<f64> {
    model_for(alphabet, background)?.probability(sequence, similarity)
}

/// At-least-similarity chance probability of `sequence` under `background`, or the
/// uniform table of `alphabet` when no background is given.
///
/// See [`ChanceModel::min_probability`].
pub fn min_chance_probability(
    alphabet: Alphabet,
    sequence: &str,
    min_similarity: f64,
    background: Option<&FrequencyTable>,
) -> Result<f64> {
    model_for(alphabet, background)?.min_probability(sequence, min_similarity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-12 * expected.abs().max(1.0),
            "{} != {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_grid_points() {
        assert_eq!(similarity_grid(0.5).unwrap().len(), 10);
        assert_eq!(similarity_grid(0.0).unwrap().len(), 20);
        assert_eq!(similarity_grid(0.85).unwrap().len(), 3);
        assert_eq!(similarity_grid(0.99).unwrap().len(), 1);
        assert!(similarity_grid(1.0).unwrap().is_empty());
    }

    #[test]
    fn test_grid_has_no_point_at_one() {
        // (1 - 0.7) / 0.05 evaluates slightly above 6
        let grid = similarity_grid(0.7).unwrap();
        assert_eq!(grid.len(), 6);
        assert!(grid.iter().all(|&s| s < 1.0));
        assert_close(grid[5], 0.95);
    }

    #[test]
    fn test_grid_anchored_at_minimum() {
        let grid = similarity_grid(0.52).unwrap();
        assert_eq!(grid.len(), 10);
        assert_close(grid[0], 0.52);
        assert_close(grid[9], 0.97);
    }

    #[test]
    fn test_grid_rejects_out_of_range() {
        assert!(similarity_grid(-0.1).is_err());
        assert!(similarity_grid(1.1).is_err());
        assert!(similarity_grid(f64::NAN).is_err());
    }

    #[test]
    fn test_half_similarity_uniform_dna() {
        // C(4, 2) * (0.25^0.5 * 0.75^0.5)^4
        let p = ChanceModel::dna().probability("ACGT", 0.5).unwrap();
        assert_close(p, 6.0 * 0.1875 * 0.1875);
    }

    #[test]
    fn test_k_rounds_half_to_even() {
        // 5 * 0.5 = 2.5 rounds to 2, so the placement factor is C(5, 2) = 10
        let p = ChanceModel::dna().probability("ACGTA", 0.5).unwrap();
        assert_close(p, 10.0 * 0.1875f64.powf(2.5));
    }

    #[test]
    fn test_zero_similarity() {
        let p = ChanceModel::dna().probability("AAAA", 0.0).unwrap();
        assert_close(p, 0.75f64.powi(4));
    }

    #[test]
    fn test_empty_sequence_is_certain() {
        assert_eq!(ChanceModel::protein().probability("", 0.3).unwrap(), 1.0);
    }

    #[test]
    fn test_certain_and_impossible_residues() {
        // p = 1 for A: matches are certain, mismatches impossible
        let table = FrequencyTable::from([('A', 1.0), ('C', 0.0)]);
        let model = ChanceModel::dna().with_background(table).unwrap();
        assert_eq!(model.probability("AAAA", 1.0).unwrap(), 1.0);
        assert_eq!(model.probability("AAAA", 0.5).unwrap(), 0.0);
        assert_eq!(model.probability("CC", 0.0).unwrap(), 1.0);
        assert_eq!(model.probability("CC", 0.5).unwrap(), 0.0);
    }

    #[test]
    fn test_min_capped_on_short_sequences() {
        // twenty grid points all round to k = 0 or k = 1 for a single residue
        let p = ChanceModel::dna().min_probability("A", 0.0).unwrap();
        assert_eq!(p, 1.0);
    }

    #[test]
    fn test_model_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChanceModel>();
    }

    #[test]
    fn test_tolerance_rechecks_background() {
        let table = FrequencyTable::from([('A', 0.5), ('C', 0.4)]);
        assert!(ChanceModel::dna().with_background(table.clone()).is_err());

        let model = ChanceModel::dna()
            .with_sum_tolerance(0.2)
            .unwrap()
            .with_background(table)
            .unwrap();
        assert!(model.with_sum_tolerance(0.0).is_err());
        assert!(ChanceModel::dna().with_sum_tolerance(-1.0).is_err());
    }
}
