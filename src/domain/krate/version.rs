// src/domain/krate/version.rs
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;
use std::fmt;

/// A `MAJOR.MINOR.PATCH` version number with optional `-pre` and `+build`
/// suffixes. Ordered by precedence; build metadata is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionNum {
    raw: String,
    core: [u64; 3],
    pre: Option<String>,
}

impl VersionNum {
    pub fn parse(value: impl Into<String>) -> DomainResult<Self> {
        let raw = value.into();
        let invalid = || DomainError::Validation(format!("invalid version number `{raw}`"));

        let without_build = raw.split_once('+').map_or(raw.as_str(), |(v, _)| v);
        let (core_part, pre) = match without_build.split_once('-') {
            Some((core, pre)) if !pre.is_empty() => (core, Some(pre.to_string())),
            Some(_) => return Err(invalid()),
            None => (without_build, None),
        };

        let mut parts = core_part.split('.');
        let mut core = [0u64; 3];
        for slot in &mut core {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = part.parse().map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self { raw, core, pre })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }
}

impl Ord for VersionNum {
    fn cmp(&self, other: &Self) -> Ordering {
        self.core
            .cmp(&other.core)
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for VersionNum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Downloads of one version on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyDownloads {
    pub date: NaiveDate,
    pub downloads: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub num: VersionNum,
    pub downloads: u64,
    pub yanked: bool,
    pub created_at: DateTime<Utc>,
    pub daily_downloads: Vec<DailyDownloads>,
}

#[derive(Debug, Clone)]
pub struct NewVersion {
    pub num: VersionNum,
    pub downloads: u64,
    pub yanked: bool,
    /// Defaults to the creation instant of the crate when absent.
    pub created_at: Option<DateTime<Utc>>,
    pub daily_downloads: Vec<DailyDownloads>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(s: &str) -> VersionNum {
        VersionNum::parse(s).unwrap()
    }

    #[test]
    fn parses_semver_shapes() {
        assert!(!num("1.2.3").is_prerelease());
        assert!(num("1.0.0-beta.2").is_prerelease());
        assert_eq!(num("0.1.0+build.5").as_str(), "0.1.0+build.5");
        for bad in ["", "1", "1.2", "1.2.3.4", "1.x.3", "1.2.3-", "v1.2.3"] {
            assert!(VersionNum::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn orders_by_precedence() {
        let mut nums = vec![num("0.10.0"), num("1.0.0"), num("0.9.1"), num("1.0.0-rc.1")];
        nums.sort();
        let sorted: Vec<&str> = nums.iter().map(VersionNum::as_str).collect();
        assert_eq!(sorted, vec!["0.9.1", "0.10.0", "1.0.0-rc.1", "1.0.0"]);
    }
}
