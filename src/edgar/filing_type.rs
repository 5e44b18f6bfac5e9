use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum::{EnumIter, IntoEnumIterator};

/// Fund holdings forms, declared in order of preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(try_from = "String", into = "String")]
pub enum FilingType {
    FormNPORTP,
    FormNPORTEX,
    FormNQ,
}

impl FilingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilingType::FormNPORTP => "NPORT-P",
            FilingType::FormNPORTEX => "NPORT-EX",
            FilingType::FormNQ => "N-Q",
        }
    }

    /// Most preferred first.
    pub fn preference_order() -> Vec<FilingType> {
        FilingType::iter().collect()
    }
}

impl fmt::Display for FilingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilingType {
    type Err = String;

    fn from_str(s: &str) -> Result<FilingType, String> {
        match s.trim().to_uppercase().as_str() {
            "NPORT-P" => Ok(FilingType::FormNPORTP),
            "NPORT-EX" => Ok(FilingType::FormNPORTEX),
            "N-Q" => Ok(FilingType::FormNQ),
            other => Err(format!("Unsupported filing type: {}", other)),
        }
    }
}

impl TryFrom<String> for FilingType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        FilingType::from_str(&s)
    }
}

impl From<FilingType> for String {
    fn from(filing_type: FilingType) -> String {
        filing_type.as_str().to_string()
    }
}
