use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::AppError;

/// A simple version struct for parsing and comparing version strings (e.g. "1.2.3").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    parts: Vec<u64>,
}

impl Version {
    /// Parse a version string into a `Version` object.
    ///
    /// Returns `None` if the string contains non-numeric segments. Segments too
    /// large for `u64` saturate at `u64::MAX`.
    pub fn parse(s: &str) -> Option<Self> {
        let parts = s.split('.').map(parse_segment).collect::<Option<Vec<u64>>>()?;
        Some(Self { parts })
    }

    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { parts: vec![major, minor, patch] }
    }
}

fn parse_segment(segment: &str) -> Option<u64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(segment.parse().unwrap_or(u64::MAX))
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.parts.len().max(other.parts.len());
        for idx in 0..max_len {
            let left_value = self.parts.get(idx).copied().unwrap_or(0);
            let right_value = other.parts.get(idx).copied().unwrap_or(0);
            match left_value.cmp(&right_value) {
                Ordering::Less => return Ordering::Less,
                Ordering::Greater => return Ordering::Greater,
                Ordering::Equal => {}
            }
        }
        Ordering::Equal
    }
}

/// Matches "1.7.9+coreos.0", "1.7.6+a08f5eeb62", "v1.7.6+a08f5eeb62", "1.7.6", "v1.6.11-gke.0".
fn kube_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^v?([0-9]+\.[0-9]+\.[0-9]+)(.*)$").expect("version regex is valid")
    })
}

const MANAGED_PLATFORM_SUFFIX: &str = "-gke.";

/// Kubernetes version as submitted by the user, reduced to `MAJOR.MINOR.PATCH`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KubeVersion {
    canonical: String,
    version: Option<Version>,
    managed_platform: bool,
}

impl KubeVersion {
    /// Normalize a loosely formatted version string.
    ///
    /// Inputs of zero or one character (after trimming) mean "no version supplied".
    pub fn normalize(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() <= 1 {
            return Ok(Self::default());
        }

        let captures = kube_version_regex()
            .captures(trimmed)
            .ok_or_else(|| AppError::InvalidVersion(trimmed.to_string()))?;
        let canonical = captures.get(1).map_or("", |m| m.as_str()).to_string();
        let suffix = captures.get(2).map_or("", |m| m.as_str());
        let version = Version::parse(&canonical)
            .ok_or_else(|| AppError::InvalidVersion(trimmed.to_string()))?;

        Ok(Self {
            canonical,
            version: Some(version),
            managed_platform: suffix.starts_with(MANAGED_PLATFORM_SUFFIX),
        })
    }

    /// Canonical `MAJOR.MINOR.PATCH`, or empty when no version was supplied.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    pub fn is_unspecified(&self) -> bool {
        self.version.is_none()
    }

    /// True for GKE builds (`-gke.N` suffix).
    pub fn is_managed_platform(&self) -> bool {
        self.managed_platform
    }
}
