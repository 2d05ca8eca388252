use crate::config::AppConfig;
use crate::consistency::{ConsistencyEngine, SystemClock};
use crate::listing::{ListingEngine, PageLimits};
use crate::logging::{LogLevel, LogRotationPolicy, RequestContext, ServiceLogger};
use crate::metrics_source::HttpMetricsSource;
use crate::notification::HttpNotificationPublisher;
use crate::profile::HttpProfileSource;
use crate::store::InMemoryRecordStore;
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::sync::Arc;

const CONFIG_PATH_VAR: &str = "APPOINTMENTS_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Fully wired service: both engines over shared adapters. The inbound
/// transport layer binds request handlers to these engines.
pub struct Service {
    pub consistency: ConsistencyEngine,
    pub listing: ListingEngine,
    pub logger: Arc<ServiceLogger>,
}

impl Service {
    /// Builds the production wiring: HTTP adapters for metrics, profile,
    /// and notifications over the configured endpoints.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let logger = Arc::new(ServiceLogger::new(LogRotationPolicy::default()));
        logger.set_level(config.log_level());

        let store = Arc::new(InMemoryRecordStore::new());
        let timeout = config.upstream_timeout();
        let metrics = Arc::new(
            HttpMetricsSource::new(&config.metrics_api_url, timeout)
                .context("metrics source construction")?,
        );
        let profile = Arc::new(
            HttpProfileSource::new(&config.company_profile_api_url, timeout)
                .context("profile source construction")?,
        );
        let publisher = Arc::new(
            HttpNotificationPublisher::new(&config.notification_api_url, timeout)
                .context("notification publisher construction")?,
        );

        let consistency = ConsistencyEngine::new(
            store.clone(),
            publisher,
            profile,
            Arc::new(SystemClock),
            logger.clone(),
        );
        let listing = ListingEngine::new(
            store,
            metrics,
            logger.clone(),
            PageLimits {
                default_items_per_page: config.default_items_per_page,
                max_items_per_page: config.max_items_per_page,
                max_officer_items_per_page: config.max_officer_items_per_page,
            },
        );
        Ok(Self {
            consistency,
            listing,
            logger,
        })
    }
}

/// Application entrypoint: load configuration and wire the service.
pub fn run() -> Result<()> {
    let config_path =
        env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let raw = fs::read_to_string(&config_path)
        .with_context(|| format!("reading config [{config_path}]"))?;
    let config = AppConfig::from_json(&raw)?;
    let service = Service::from_config(&config)?;
    service.logger.log(
        LogLevel::Info,
        "service_started",
        &RequestContext::new("startup"),
        None,
        None,
        &format!("configuration loaded from [{config_path}]"),
    );
    Ok(())
}
