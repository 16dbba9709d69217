// ABOUTME: Dotted numeric version parsing and comparison for feature gating.
// ABOUTME: Accepts major.minor.patch with an optional build suffix; ordering is numeric component-wise.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised when a version string cannot be parsed.
#[derive(Debug, Error)]
pub enum VersionError {
    #[error("malformed version string: {0:?}")]
    Malformed(String),
}

/// A major.minor.patch version with total ordering.
///
/// Platform components report versions like `3.4.0` or `3.4.0-b177.20220325`;
/// anything after the first `-` is a build qualifier and does not participate
/// in ordering. Callers gating features on versions treat a parse failure the
/// same as an absent version (below any threshold).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string, discarding any `-` build suffix.
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let core = raw.split_once('-').map_or(raw, |(core, _)| core);
        let mut parts = core.split('.');

        let mut component = || -> Result<u64, VersionError> {
            parts
                .next()
                .and_then(|p| p.parse::<u64>().ok())
                .ok_or_else(|| VersionError::Malformed(raw.to_string()))
        };

        let version = Self {
            major: component()?,
            minor: component()?,
            patch: component()?,
        };

        if parts.next().is_some() {
            return Err(VersionError::Malformed(raw.to_string()));
        }
        Ok(version)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
