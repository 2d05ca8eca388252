use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Wire format of the delta version token (`yyyyMMddHHmmssSSSSSS`, UTC).
const DELTA_AT_FORMAT: &str = "%Y%m%d%H%M%S%6f";

/// Logical version timestamp carried by every delta.
///
/// `DeltaAt` is the sole ordering key for conflict resolution: an incoming
/// delta strictly older than the stored one is rejected as stale, and an
/// equal one is accepted so that replays stay idempotent. It is not a
/// persistence timestamp; `created`/`updated` bookkeeping lives elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeltaAt(DateTime<Utc>);

impl DeltaAt {
    /// Parses the 20-digit wire token used by the delta pipeline.
    pub fn parse(token: &str) -> Result<Self, DeltaAtError> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(DeltaAtError::Missing);
        }
        NaiveDateTime::parse_from_str(trimmed, DELTA_AT_FORMAT)
            .map(|naive| Self(naive.and_utc()))
            .map_err(|_| DeltaAtError::Malformed(trimmed.to_string()))
    }

    /// Wraps an already-resolved instant (tests, replay tooling).
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// The underlying instant.
    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Returns true when `self` must be rejected against an already-stored
    /// version: strictly older loses, equal or newer wins.
    pub fn is_stale_against(&self, stored: DeltaAt) -> bool {
        *self < stored
    }
}

impl fmt::Display for DeltaAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DELTA_AT_FORMAT))
    }
}

impl FromStr for DeltaAt {
    type Err = DeltaAtError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::parse(token)
    }
}

impl TryFrom<String> for DeltaAt {
    type Error = DeltaAtError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        Self::parse(&token)
    }
}

impl From<DeltaAt> for String {
    fn from(delta_at: DeltaAt) -> Self {
        delta_at.to_string()
    }
}

/// Errors surfaced while reading a delta version token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeltaAtError {
    #[error("delta_at is null or empty")]
    Missing,
    #[error("delta_at [{0}] is not a valid yyyyMMddHHmmssSSSSSS token")]
    Malformed(String),
}
