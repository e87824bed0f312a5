//! Version utilities.
//!
//! This module provides a semantic version type along with a compact
//! packed integer form suitable for cheap storage and comparison, and a
//! helper for enforcing a minimum required version.

use crate::error::VersionError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Error parsing a version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionParseError {
    /// The invalid version string.
    pub version: String,

    /// The reason for the error.
    pub reason: String,
}

impl fmt::Display for VersionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid version '{}': {}", self.version, self.reason)
    }
}

impl std::error::Error for VersionParseError {}

/// A semantic version.
///
/// Follows the semantic versioning specification (https://semver.org/):
/// three numeric components, optional prerelease identifiers, optional
/// build metadata. Build metadata never participates in ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Major version number.
    pub major: u32,

    /// Minor version number.
    pub minor: u32,

    /// Patch version number.
    pub patch: u32,

    /// Prerelease identifiers.
    pub prerelease: Option<String>,

    /// Build metadata.
    pub build: Option<String>,
}

impl Version {
    /// Create a new version with no prerelease or build metadata.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// Add prerelease identifiers to this version.
    pub fn with_prerelease(mut self, prerelease: impl Into<String>) -> Self {
        self.prerelease = Some(prerelease.into());
        self
    }

    /// Add build metadata to this version.
    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = Some(build.into());
        self
    }

    /// Check whether this version carries prerelease identifiers.
    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// Check if this version is compatible with the given version
    /// according to semantic versioning.
    ///
    /// Two versions are compatible when they share a major version and
    /// this version is not newer than `other`. Before 1.0.0 a minor
    /// version bump is considered breaking, so 0.x versions must also
    /// share their minor number.
    ///
    /// # Arguments
    ///
    /// * `other` - The version to check compatibility with.
    ///
    /// # Returns
    ///
    /// `true` if code built against this version can run against `other`.
    pub fn is_compatible_with(&self, other: &Version) -> bool {
        if self.major != other.major {
            return false;
        }
        if self.major == 0 && self.minor != other.minor {
            return false;
        }
        self <= other
    }

    /// Create a new incompatible version by incrementing the major version.
    /// Minor, patch, prerelease, and build are reset.
    pub fn increment_major(&self) -> Self {
        Version::new(self.major + 1, 0, 0)
    }

    /// Create a new compatible version by incrementing the minor version.
    /// Patch, prerelease, and build are reset.
    pub fn increment_minor(&self) -> Self {
        Version::new(self.major, self.minor + 1, 0)
    }

    /// Create a new compatible version by incrementing the patch version.
    /// Prerelease and build are reset.
    pub fn increment_patch(&self) -> Self {
        Version::new(self.major, self.minor, self.patch + 1)
    }

    /// Pack the numeric components into a single `u32`.
    ///
    /// The encoding is `major << 16 | minor << 8 | patch`, so packed
    /// values of release versions compare in version order. Prerelease
    /// identifiers and build metadata are not representable and are
    /// dropped.
    ///
    /// # Returns
    ///
    /// The packed form, or `VersionError::FieldTooLarge` if any component
    /// exceeds 255.
    pub fn to_packed(&self) -> Result<u32, VersionError> {
        let check = |field: &'static str, value: u32| {
            if value > 0xff {
                Err(VersionError::FieldTooLarge {
                    field,
                    value: u64::from(value),
                })
            } else {
                Ok(value)
            }
        };

        let major = check("major", self.major)?;
        let minor = check("minor", self.minor)?;
        let patch = check("patch", self.patch)?;
        Ok((major << 16) | (minor << 8) | patch)
    }

    /// Unpack a version previously encoded with [`Version::to_packed`].
    pub fn from_packed(packed: u32) -> Self {
        Version::new((packed >> 16) & 0xff, (packed >> 8) & 0xff, packed & 0xff)
    }
}

/// Ensure that `current` meets a minimum version requirement.
///
/// # Arguments
///
/// * `current` - The version actually present.
/// * `required` - The minimum acceptable version.
///
/// # Returns
///
/// `Ok(())` when `current >= required`, `VersionError::TooOld` otherwise.
pub fn ensure_version(current: &Version, required: &Version) -> Result<(), VersionError> {
    if current < required {
        return Err(VersionError::TooOld {
            required: required.clone(),
            current: current.clone(),
        });
    }
    Ok(())
}

/// Compare two prerelease identifier strings per semver precedence:
/// identifiers are dot-separated, numeric ones compare numerically and
/// rank below alphanumeric ones, and a shorter list ranks below a longer
/// one when all shared identifiers are equal.
fn compare_prerelease(a: &str, b: &str) -> Ordering {
    let a_parts: Vec<&str> = a.split('.').collect();
    let b_parts: Vec<&str> = b.split('.').collect();

    for (a_part, b_part) in a_parts.iter().zip(b_parts.iter()) {
        let a_num = a_part.parse::<u64>().ok();
        let b_num = b_part.parse::<u64>().ok();

        let ordering = match (a_num, b_num) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a_part.cmp(b_part),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    a_parts.len().cmp(&b_parts.len())
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let numeric = (self.major, self.minor, self.patch).cmp(&(
            other.major,
            other.minor,
            other.patch,
        ));
        if numeric != Ordering::Equal {
            return numeric;
        }

        // A prerelease ranks below the corresponding release; build
        // metadata is ignored entirely.
        match (&self.prerelease, &other.prerelease) {
            (None, None) => Ordering::Equal,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(a), Some(b)) => compare_prerelease(a, b),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(prerelease) = &self.prerelease {
            write!(f, "-{}", prerelease)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason: &str| VersionParseError {
            version: s.to_string(),
            reason: reason.to_string(),
        };

        // Peel off build metadata, then prerelease identifiers.
        let (rest, build) = match s.split_once('+') {
            Some((rest, build)) => (rest, Some(build.to_string())),
            None => (s, None),
        };
        let (core, prerelease) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre.to_string())),
            None => (rest, None),
        };

        let mut numbers = core.split('.');
        let mut component = |name: &str| -> Result<u32, VersionParseError> {
            numbers
                .next()
                .filter(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
                .ok_or_else(|| error(&format!("Missing or invalid {} version", name)))?
                .parse()
                .map_err(|_| error(&format!("Invalid {} version", name)))
        };

        let major = component("major")?;
        let minor = component("minor")?;
        let patch = component("patch")?;
        if numbers.next().is_some() {
            return Err(error("Too many version components"));
        }

        let valid_identifiers = |text: &str| {
            !text.is_empty()
                && text.split('.').all(|part| {
                    !part.is_empty()
                        && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                })
        };

        if let Some(pre) = &prerelease {
            if !valid_identifiers(pre) {
                return Err(error("Invalid prerelease identifier"));
            }
        }
        if let Some(build) = &build {
            if !valid_identifiers(build) {
                return Err(error("Invalid build metadata"));
            }
        }

        Ok(Self {
            major,
            minor,
            patch,
            prerelease,
            build,
        })
    }
}
