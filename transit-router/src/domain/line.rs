//! Transit line records.

use std::fmt;

use super::{LineCode, StopCode};

/// Suffix that marks a night service code.
pub const NIGHT_SUFFIX: char = 'M';

/// Which half of the timetable a line or graph belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceCategory {
    Day,
    Night,
}

impl ServiceCategory {
    /// Category implied by a service code: night when it ends in `M`.
    pub fn of(code: &LineCode) -> Self {
        if code.as_str().ends_with(NIGHT_SUFFIX) {
            ServiceCategory::Night
        } else {
            ServiceCategory::Day
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceCategory::Day => f.write_str("day"),
            ServiceCategory::Night => f.write_str("night"),
        }
    }
}

/// One directional run of a transit service.
///
/// Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    code: LineCode,
    name: String,
    direction: u8,
    stops: Vec<StopCode>,
}

impl Line {
    pub fn new(code: LineCode, name: impl Into<String>, direction: u8, stops: Vec<StopCode>) -> Self {
        Self {
            code,
            name: name.into(),
            direction,
            stops,
        }
    }

    pub fn code(&self) -> &LineCode {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> u8 {
        self.direction
    }

    /// Stops in the order the service visits them.
    pub fn stops(&self) -> &[StopCode] {
        &self.stops
    }

    pub fn category(&self) -> ServiceCategory {
        ServiceCategory::of(&self.code)
    }
}
