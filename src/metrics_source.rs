use crate::model::RegisterType;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// Register location value meaning the register is publicly held at the
/// registry rather than at the company's own office.
pub const PUBLIC_REGISTER: &str = "public-register";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("no metrics held for company [{0}]")]
    CompanyNotFound(String),
    #[error("metrics source unavailable: {0}")]
    Unavailable(String),
}

/// Where each register is held, as reported by the metrics source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterStatus {
    pub directors_register_moved_to: Option<String>,
    pub secretaries_register_moved_to: Option<String>,
    pub llp_members_register_moved_to: Option<String>,
}

impl RegisterStatus {
    /// True when the named register is held publicly, which is the
    /// precondition for serving a register view of that type.
    pub fn is_public(&self, register_type: RegisterType) -> bool {
        let moved_to = match register_type {
            RegisterType::Directors => &self.directors_register_moved_to,
            RegisterType::Secretaries => &self.secretaries_register_moved_to,
            RegisterType::LlpMembers => &self.llp_members_register_moved_to,
        };
        moved_to.as_deref() == Some(PUBLIC_REGISTER)
    }
}

/// Authoritative officer counts for one company. Counts come from the
/// metrics pipeline, never from counting stored records, so listings stay
/// consistent with the rest of the registry even mid-reindex.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyMetrics {
    pub active_count: u32,
    pub resigned_count: u32,
    pub total_count: u32,
    pub active_directors_count: u32,
    pub active_secretaries_count: u32,
    pub active_llp_members_count: u32,
    pub registers: RegisterStatus,
}

/// Metrics Source Adapter: authoritative counts and register locations per
/// company.
pub trait MetricsSource: Send + Sync {
    fn fetch(&self, company_number: &str) -> Result<CompanyMetrics, MetricsError>;
}

#[derive(Debug, Deserialize)]
struct WireRegisterEntry {
    register_moved_to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireRegisters {
    directors: Option<WireRegisterEntry>,
    secretaries: Option<WireRegisterEntry>,
    llp_members: Option<WireRegisterEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct WireAppointmentCounts {
    #[serde(default)]
    active_count: u32,
    #[serde(default)]
    resigned_count: u32,
    #[serde(default)]
    total_count: u32,
    #[serde(default)]
    active_directors_count: u32,
    #[serde(default)]
    active_secretaries_count: u32,
    #[serde(default)]
    active_llp_members_count: u32,
}

#[derive(Debug, Deserialize)]
struct WireCounts {
    appointments: Option<WireAppointmentCounts>,
}

#[derive(Debug, Deserialize)]
struct WireMetrics {
    counts: Option<WireCounts>,
    registers: Option<WireRegisters>,
}

impl From<WireMetrics> for CompanyMetrics {
    fn from(wire: WireMetrics) -> Self {
        let counts = wire
            .counts
            .and_then(|counts| counts.appointments)
            .unwrap_or_default();
        let registers = wire.registers.unwrap_or_default();
        Self {
            active_count: counts.active_count,
            resigned_count: counts.resigned_count,
            total_count: counts.total_count,
            active_directors_count: counts.active_directors_count,
            active_secretaries_count: counts.active_secretaries_count,
            active_llp_members_count: counts.active_llp_members_count,
            registers: RegisterStatus {
                directors_register_moved_to: registers
                    .directors
                    .and_then(|entry| entry.register_moved_to),
                secretaries_register_moved_to: registers
                    .secretaries
                    .and_then(|entry| entry.register_moved_to),
                llp_members_register_moved_to: registers
                    .llp_members
                    .and_then(|entry| entry.register_moved_to),
            },
        }
    }
}

/// HTTP metrics source backed by the registry metrics API.
pub struct HttpMetricsSource {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpMetricsSource {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, MetricsError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| MetricsError::Unavailable(format!("client construction: {err}")))?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl MetricsSource for HttpMetricsSource {
    fn fetch(&self, company_number: &str) -> Result<CompanyMetrics, MetricsError> {
        let url = format!("{}/company/{}/metrics", self.endpoint, company_number);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| MetricsError::Unavailable(format!("metrics fetch: {err}")))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MetricsError::CompanyNotFound(company_number.to_string()));
        }
        if !response.status().is_success() {
            return Err(MetricsError::Unavailable(format!(
                "metrics fetch for [{company_number}] returned {}",
                response.status()
            )));
        }
        let wire: WireMetrics = response
            .json()
            .map_err(|err| MetricsError::Unavailable(format!("metrics decode: {err}")))?;
        Ok(wire.into())
    }
}

/// Fixed metrics source holding preloaded responses per company. Companies
/// without an entry behave as unknown to the metrics pipeline.
#[derive(Debug, Default)]
pub struct StaticMetricsSource {
    entries: Mutex<HashMap<String, CompanyMetrics>>,
}

impl StaticMetricsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, company_number: &str, metrics: CompanyMetrics) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(company_number.to_string(), metrics);
        }
    }
}

impl MetricsSource for StaticMetricsSource {
    fn fetch(&self, company_number: &str) -> Result<CompanyMetrics, MetricsError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| MetricsError::Unavailable("metrics table lock poisoned".to_string()))?;
        entries
            .get(company_number)
            .cloned()
            .ok_or_else(|| MetricsError::CompanyNotFound(company_number.to_string()))
    }
}
