use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeqProbError {
    #[error("Not a {alphabet} sequence: invalid residue '{residue}' at position {position}")]
    InvalidAlphabet {
        alphabet: &'static str,
        residue: char,
        position: usize,
    },

    #[error("Empty sequence: ratio is undefined for a sequence of length 0")]
    EmptySequence,

    #[error("Parameter out of range: {name} = {value}, {message}")]
    OutOfRangeParameter {
        name: String,
        value: String,
        message: String,
    },

    #[error("Invalid frequency table: {0}")]
    InvalidFrequencyTable(String),

    #[error("Data error: {0}")]
    DataError(String),
}

/// Type alias for Result with SeqProbError
pub type Result<T> = std::result::Result<T, SeqProbError>;

impl SeqProbError {
    /// Create a new InvalidAlphabet error
    pub fn invalid_alphabet(alphabet: &'static str, residue: char, position: usize) -> Self {
        SeqProbError::InvalidAlphabet {
            alphabet,
            residue,
            position,
        }
    }

    /// Create a new OutOfRangeParameter error
    pub fn out_of_range(
        name: impl Into<String>,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        SeqProbError::OutOfRangeParameter {
            name: name.into(),
            value: value.to_string(),
            message: message.into(),
        }
    }

    /// Create a new InvalidFrequencyTable error
    pub fn invalid_table(message: impl Into<String>) -> Self {
        SeqProbError::InvalidFrequencyTable(message.into())
    }

    /// True when the error is the "not a sequence of this type" outcome
    pub fn is_invalid_alphabet(&self) -> bool {
        matches!(self, SeqProbError::InvalidAlphabet { .. })
    }
}
