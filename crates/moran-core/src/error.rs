//! Error types for the simulator.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Incorrect value for {parameter}. {message}")]
    IncorrectValue { parameter: String, message: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    pub fn incorrect_value(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Error::IncorrectValue {
            parameter: parameter.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incorrect_value_message() {
        let err = Error::incorrect_value(
            "Transition Matrix",
            "Transition probabilities need to add up to 1.0.",
        );
        assert_eq!(
            err.to_string(),
            "Incorrect value for Transition Matrix. Transition probabilities need to add up to 1.0."
        );
    }
}
