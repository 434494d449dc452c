//! Desired lifecycle state of a profile.
use std::fmt;
use std::str::FromStr;

/// Whether a profile should be installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ensure {
    /// Installed (alias `installed`).
    #[default]
    Present,
    /// Not installed (alias `removed`).
    Absent,
}

/// Accepted spellings, for error messages.
pub const ENSURE_VALUES: &str = "present, absent, installed or removed";

impl FromStr for Ensure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" | "installed" => Ok(Self::Present),
            "absent" | "removed" => Ok(Self::Absent),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Ensure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Absent => write!(f, "absent"),
        }
    }
}
