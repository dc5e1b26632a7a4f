use std::collections::HashMap;

/// Per-symbol background probabilities
/// Values lie in [0, 1] and sum to 1 for a well-formed model
pub type FrequencyTable = HashMap<char, f64>;

/// Occurrence count of each distinct residue present in a sequence
pub type ResidueCounts = HashMap<char, usize>;
