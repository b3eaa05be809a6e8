//! Stop and line code types.

use std::fmt;

/// Error returned when parsing an invalid stop or line code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid code {code:?}: {reason}")]
pub struct InvalidCode {
    code: String,
    reason: &'static str,
}

fn validate(s: &str) -> Result<(), InvalidCode> {
    if s.is_empty() {
        return Err(InvalidCode {
            code: s.to_string(),
            reason: "must not be empty",
        });
    }

    if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(InvalidCode {
            code: s.to_string(),
            reason: "must not contain whitespace",
        });
    }

    Ok(())
}

/// Identity of a stop within a graph.
///
/// Codes are non-empty and free of whitespace. This type guarantees that any
/// `StopCode` value is valid by construction.
///
/// # Examples
///
/// ```
/// use transit_router::domain::StopCode;
///
/// let code = StopCode::parse("BCM1").unwrap();
/// assert_eq!(code.as_str(), "BCM1");
///
/// // Surrounding whitespace is trimmed by `parse_normalized` only
/// assert!(StopCode::parse(" BCM1").is_err());
/// assert_eq!(StopCode::parse_normalized(" bcm1 ").unwrap().as_str(), "BCM1");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopCode(String);

impl StopCode {
    /// Parse a stop code from a string, exactly as given.
    pub fn parse(s: &str) -> Result<Self, InvalidCode> {
        validate(s)?;
        Ok(StopCode(s.to_string()))
    }

    /// Parse a stop code, trimming whitespace and uppercasing.
    ///
    /// Datasets store codes in uppercase; user input often does not.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidCode> {
        Self::parse(&s.trim().to_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopCode({})", self.0)
    }
}

impl fmt::Display for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Service code of a transit line (e.g. `"205"` or the night service `"5M"`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineCode(String);

impl LineCode {
    /// Parse a line code from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidCode> {
        validate(s)?;
        Ok(LineCode(s.to_string()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineCode({})", self.0)
    }
}

impl fmt::Display for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
