//! Lenient semantic-version parsing and comparison.
//!
//! The fleet's version endpoints publish plain version strings. Most are
//! full `major.minor.patch` triples, but older publishing scripts emitted
//! truncated forms like `1.2`, and some tags carry a `v` prefix. This module
//! normalizes those forms before handing them to [`semver`], which provides
//! the total ordering the update check relies on.
//!
//! A value that still fails to parse after normalization is an error; the
//! updater never coerces garbage into a version.
//!
//! # Examples
//!
//! ```rust
//! use fleet_updater::version;
//!
//! let a = version::parse("1.9.0").unwrap();
//! let b = version::parse("1.10.0").unwrap();
//! assert!(a < b);
//!
//! // Missing components are treated as zero
//! assert_eq!(version::parse("1.2").unwrap(), version::parse("1.2.0").unwrap());
//!
//! // Common tag prefixes are accepted
//! assert_eq!(version::parse("v2.0.1").unwrap(), version::parse("2.0.1").unwrap());
//! ```

pub use semver::Version;
use thiserror::Error;

/// A version string that could not be parsed, even after normalization.
#[derive(Debug, Error)]
#[error("`{input}` is not a valid version")]
pub struct VersionParseError {
    /// The original (trimmed) input that was rejected.
    pub input: String,
    #[source]
    source: semver::Error,
}

/// Parse a version string, tolerating a `v` prefix and missing components.
///
/// Normalization steps:
/// 1. Trim surrounding whitespace
/// 2. Strip a single leading `v` or `V`
/// 3. Pad missing minor/patch components with zeros (`"1.2"` -> `"1.2.0"`)
///
/// The normalized string must then be a valid semantic version.
///
/// # Errors
///
/// Returns [`VersionParseError`] when the input is not a version. The
/// original input is preserved in the error for logging.
pub fn parse(input: &str) -> Result<Version, VersionParseError> {
    let trimmed = input.trim();
    let bare = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    let candidate = match bare.split('.').count() {
        1 => format!("{bare}.0.0"),
        2 => format!("{bare}.0"),
        _ => bare.to_string(),
    };

    Version::parse(&candidate).map_err(|source| VersionParseError {
        input: trimmed.to_string(),
        source,
    })
}
