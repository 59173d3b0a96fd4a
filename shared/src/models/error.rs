use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification attached to every failed search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    ClientInput,
    ConfigurationMissing,
    GenerationExhausted,
    GenerationFailed,
    Unexpected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ClientInput => "client-input",
            ErrorKind::ConfigurationMissing => "configuration-missing",
            ErrorKind::GenerationExhausted => "generation-exhausted",
            ErrorKind::GenerationFailed => "generation-failed",
            ErrorKind::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub kind: ErrorKind,
}
