//! Split granularity

use crate::TextError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How source text is divided into fragments
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// One grapheme cluster per fragment
    #[default]
    #[serde(rename = "chars", alias = "characters")]
    Characters,
    /// Words and the whitespace runs between them
    #[serde(rename = "words")]
    Words,
    /// Lines, without their break characters
    #[serde(rename = "lines")]
    Lines,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Characters => "chars",
            Granularity::Words => "words",
            Granularity::Lines => "lines",
        }
    }
}

impl FromStr for Granularity {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chars" | "char" | "characters" => Ok(Granularity::Characters),
            "words" | "word" => Ok(Granularity::Words),
            "lines" | "line" => Ok(Granularity::Lines),
            _ => Err(TextError::UnknownGranularity(s.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("chars".parse(), Ok(Granularity::Characters));
        assert_eq!("Words".parse(), Ok(Granularity::Words));
        assert_eq!(" line ".parse(), Ok(Granularity::Lines));
        assert_eq!(
            "sentences".parse::<Granularity>(),
            Err(TextError::UnknownGranularity("sentences".to_string()))
        );
    }

    #[test]
    fn test_serde_identifiers() {
        assert_eq!(
            serde_json::to_string(&Granularity::Characters).unwrap(),
            "\"chars\""
        );
        let words: Granularity = serde_json::from_str("\"words\"").unwrap();
        assert_eq!(words, Granularity::Words);
        let chars: Granularity = serde_json::from_str("\"characters\"").unwrap();
        assert_eq!(chars, Granularity::Characters);
    }
}
