use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a construct in a source file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Location {
    /// Source file name
    pub file: String,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
}

impl Location {
    /// Create a new location
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}:{})", self.file, self.line, self.column)
    }
}

/// Provenance tag explaining where an assertion came from
///
/// Attached to expressions and VCs so a failed proof can be traced back to the
/// clause that produced the goal (e.g. "Ensures Clause of Push").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationDetailModel {
    /// Location of the construct the assertion originated at
    pub source: Location,
    /// Location of the construct that generated the goal
    pub destination: Location,
    /// Human readable explanation
    pub message: String,
}

impl LocationDetailModel {
    /// Create a new detail model
    pub fn new(source: Location, destination: Location, message: impl Into<String>) -> Self {
        Self {
            source,
            destination,
            message: message.into(),
        }
    }
}

impl fmt::Display for LocationDetailModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.destination, self.message)
    }
}
