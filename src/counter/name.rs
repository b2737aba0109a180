use std::{fmt::Display, ops::Deref};

use crate::AppError;

pub const MAX_NAME_LEN: usize = 100;

/// A counter name that passed validation: 1..=100 chars of `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CounterName(String);

impl CounterName {
    /// Trims `raw` and checks it against the naming rule. No case folding.
    pub fn validate(raw: &str) -> Result<Self, AppError> {
        let sanitized = raw.trim_matches(is_trimmed);
        let len = sanitized.chars().count();
        if len == 0 || len > MAX_NAME_LEN {
            return Err(AppError::InvalidName(raw.to_string()));
        }
        if !sanitized.chars().all(is_name_char) {
            return Err(AppError::InvalidName(raw.to_string()));
        }
        Ok(CounterName(sanitized.to_string()))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

// whitespace plus the byte order mark, which char::is_whitespace leaves out
fn is_trimmed(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl Deref for CounterName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for CounterName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_valid_names_pass_unchanged() -> Result<()> {
        for raw in ["visits", "a", "A-b_C-9", "0", "__", "--", "MiXeD_case-123"] {
            assert_eq!(&*CounterName::validate(raw)?, raw);
        }
        let longest = "x".repeat(MAX_NAME_LEN);
        assert_eq!(&*CounterName::validate(&longest)?, longest.as_str());
        Ok(())
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() -> Result<()> {
        assert_eq!(&*CounterName::validate("  visits\t")?, "visits");
        assert_eq!(&*CounterName::validate("\nhits \n")?, "hits");
        assert_eq!(&*CounterName::validate("\u{feff}visits")?, "visits");
        assert_eq!(&*CounterName::validate("\u{a0}visits\u{feff}")?, "visits");
        Ok(())
    }

    #[test]
    fn test_invalid_names_rejected() {
        let too_long = "y".repeat(MAX_NAME_LEN + 1);
        for raw in [
            "",
            "   ",
            "\t\n",
            "bad name!",
            "a b",
            "dot.ted",
            "slash/ed",
            "semi;colon",
            "quote\"",
            "caf\u{e9}",
            "dash\u{2014}em",
            "\u{ff01}",
            "emoji\u{1f600}",
            too_long.as_str(),
        ] {
            let err = CounterName::validate(raw).unwrap_err();
            assert!(matches!(err, AppError::InvalidName(_)), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_length_counted_after_trim() -> Result<()> {
        let padded = format!("  {}  ", "z".repeat(MAX_NAME_LEN));
        assert_eq!(CounterName::validate(&padded)?.len(), MAX_NAME_LEN);
        Ok(())
    }

    #[test]
    fn test_validation_is_idempotent() -> Result<()> {
        for raw in [" visits ", "x_y-z", "Q"] {
            let once = CounterName::validate(raw)?;
            let twice = CounterName::validate(&once)?;
            assert_eq!(once, twice);
        }
        Ok(())
    }
}
