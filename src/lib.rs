//! Composition statistics and chance-similarity probabilities for DNA, RNA and protein sequences

pub mod alphabet;
pub mod background;
pub mod chance;
pub mod composition;
pub mod error;
pub mod frame;
pub mod types;

pub use alphabet::Alphabet;
pub use chance::{chance_probability, min_chance_probability, ChanceModel};
pub use error::{Result, SeqProbError};
pub use types::{FrequencyTable, ResidueCounts};
