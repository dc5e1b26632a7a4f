use crate::chance::ChanceModel;
use crate::composition;
use crate::error::{Result, SeqProbError};
use polars::prelude::*;
use rayon::prelude::*;

/// Collects the "sequence" column, failing on a missing column or a null row
fn sequences(df: &DataFrame) -> Result<Vec<&str>> {
    let column = df
        .column("sequence")
        .map_err(|e| SeqProbError::DataError(e.to_string()))?
        .str()
        .map_err(|e| SeqProbError::DataError(e.to_string()))?;

    column
        .into_iter()
        .enumerate()
        .map(|(idx, seq)| {
            seq.ok_or_else(|| SeqProbError::DataError(format!("null sequence at row {}", idx)))
        })
        .collect()
}

/// Pairs the input labels with a computed column
fn with_labels(df: &DataFrame, name: &str, values: Vec<f64>) -> Result<DataFrame> {
    let labels = df
        .column("label")
        .map_err(|e| SeqProbError::DataError(e.to_string()))?;

    DataFrame::new(vec![labels.clone(), Column::new(name.into(), values)])
        .map_err(|e| SeqProbError::DataError(e.to_string()))
}

/// GC content of every row of a label/sequence frame.
///
/// The output keeps the input's "label" column and adds "gc_content", in input order.
/// Rows are evaluated in parallel and the call fails as a whole on any bad row,
/// so an empty sequence anywhere yields `SeqProbError::EmptySequence` and no frame.
///
/// # Errors
/// * `SeqProbError::DataError` on a missing "label" or "sequence" column or a null sequence
/// * `SeqProbError::EmptySequence` if any sequence is empty
pub fn gc_content(df: &DataFrame) -> Result<DataFrame> {
    let gc_content = sequences(df)?
        .par_iter()
        .map(|seq| composition::gc_content(seq))
        .collect::<Result<Vec<f64>>>()?;

    with_labels(df, "gc_content", gc_content)
}

/// Calculates the exact-similarity chance probability of each sequence.
///
/// A failing row aborts the call: that row's error is returned and no
/// partial frame is produced.
///
/// # Returns
/// * `Result<DataFrame>` - Original labels and a "chance_probability" column
///
/// # Errors
/// * Returns `SeqProbError::DataError` if required columns are missing or a sequence is null
/// * Returns `SeqProbError::InvalidAlphabet` if any sequence is not of the model's alphabet
/// * Returns `SeqProbError::OutOfRangeParameter` if `similarity` is not in [0, 1]
pub fn chance_probabilities(
    df: &DataFrame,
    model: &ChanceModel,
    similarity: f64,
) -> Result<DataFrame> {
    let probabilities = sequences(df)?
        .par_iter()
        .map(|seq| model.probability(seq, similarity))
        .collect::<Result<Vec<f64>>>()?;

    with_labels(df, "chance_probability", probabilities)
}

/// Calculates the at-least-similarity chance probability of each sequence.
///
/// # Returns
/// * `Result<DataFrame>` - Original labels and a "min_chance_probability" column
///
/// # Errors
/// Same as [`chance_probabilities`].
pub fn min_chance_probabilities(
    df: &DataFrame,
    model: &ChanceModel,
    min_similarity: f64,
) -> Result<DataFrame> {
    let probabilities = sequences(df)?
        .par_iter()
        .map(|seq| model.min_probability(seq, min_similarity))
        .collect::<Result<Vec<f64>>>()?;

    with_labels(df, "min_chance_probability", probabilities)
}
