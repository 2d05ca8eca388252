use crate::model::CompanyStatus;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("no profile held for company [{0}]")]
    CompanyNotFound(String),
    #[error("profile source unavailable: {0}")]
    Unavailable(String),
}

/// Company name and status as known to the registry profile service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyProfile {
    pub company_name: Option<String>,
    pub company_status: Option<CompanyStatus>,
}

/// Company Profile Adapter: name/status enrichment used when ingesting
/// deltas. Enrichment is best-effort; callers treat failures as non-fatal.
pub trait CompanyProfileSource: Send + Sync {
    fn fetch(&self, company_number: &str) -> Result<CompanyProfile, ProfileError>;
}

#[derive(Debug, Deserialize)]
struct WireProfile {
    company_name: Option<String>,
    company_status: Option<String>,
}

impl From<WireProfile> for CompanyProfile {
    fn from(wire: WireProfile) -> Self {
        Self {
            company_name: wire.company_name,
            company_status: wire
                .company_status
                .as_deref()
                .and_then(CompanyStatus::parse),
        }
    }
}

/// HTTP profile source backed by the registry profile API.
pub struct HttpProfileSource {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpProfileSource {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ProfileError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ProfileError::Unavailable(format!("client construction: {err}")))?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl CompanyProfileSource for HttpProfileSource {
    fn fetch(&self, company_number: &str) -> Result<CompanyProfile, ProfileError> {
        let url = format!("{}/company/{}", self.endpoint, company_number);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| ProfileError::Unavailable(format!("profile fetch: {err}")))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProfileError::CompanyNotFound(company_number.to_string()));
        }
        if !response.status().is_success() {
            return Err(ProfileError::Unavailable(format!(
                "profile fetch for [{company_number}] returned {}",
                response.status()
            )));
        }
        let wire: WireProfile = response
            .json()
            .map_err(|err| ProfileError::Unavailable(format!("profile decode: {err}")))?;
        Ok(wire.into())
    }
}

/// Profile source with preloaded entries. Companies without an entry report
/// not found, matching an empty registry.
#[derive(Debug, Default)]
pub struct StaticProfileSource {
    entries: Mutex<HashMap<String, CompanyProfile>>,
}

impl StaticProfileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, company_number: &str, profile: CompanyProfile) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(company_number.to_string(), profile);
        }
    }
}

impl CompanyProfileSource for StaticProfileSource {
    fn fetch(&self, company_number: &str) -> Result<CompanyProfile, ProfileError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| ProfileError::Unavailable("profile table lock poisoned".to_string()))?;
        entries
            .get(company_number)
            .cloned()
            .ok_or_else(|| ProfileError::CompanyNotFound(company_number.to_string()))
    }
}
