use crate::logging::RequestContext;
use serde::Serialize;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// Failure to hand a notification to the downstream stream. By the time
/// publishing runs the store write has already committed, so this maps to a
/// gateway-class error rather than a rollback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("notification publish failed: {0}")]
pub struct PublishError(pub String);

/// Notification Publisher Adapter: resource-changed and officer-merge
/// events emitted after committed writes.
pub trait NotificationPublisher: Send + Sync {
    /// Announce that an appointment resource was created or updated.
    fn publish_changed(
        &self,
        context: &RequestContext,
        company_number: &str,
        appointment_id: &str,
    ) -> Result<(), PublishError>;

    /// Announce that an appointment resource was deleted. `snapshot` carries
    /// the cleaned final state of the record, or the stub back-link when the
    /// record was never held locally.
    fn publish_deleted(
        &self,
        context: &RequestContext,
        company_number: &str,
        appointment_id: &str,
        snapshot: Value,
    ) -> Result<(), PublishError>;

    /// Announce that two officer identities refer to the same person.
    fn publish_officer_merge(
        &self,
        context: &RequestContext,
        officer_id: &str,
        previous_officer_id: &str,
    ) -> Result<(), PublishError>;
}

#[derive(Debug, Serialize)]
struct WireResourceChanged<'a> {
    resource_kind: &'a str,
    resource_uri: String,
    context_id: &'a str,
    event_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted_data: Option<&'a Value>,
}

#[derive(Debug, Serialize)]
struct WireOfficerMerge<'a> {
    context_id: &'a str,
    officer_id: &'a str,
    previous_officer_id: &'a str,
}

/// HTTP publisher posting events to the downstream notification endpoint.
pub struct HttpNotificationPublisher {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpNotificationPublisher {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, PublishError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PublishError(format!("client construction: {err}")))?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<(), PublishError> {
        let url = format!("{}{}", self.endpoint, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|err| PublishError(format!("post {path}: {err}")))?;
        if !response.status().is_success() {
            return Err(PublishError(format!(
                "post {path} returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

impl NotificationPublisher for HttpNotificationPublisher {
    fn publish_changed(
        &self,
        context: &RequestContext,
        company_number: &str,
        appointment_id: &str,
    ) -> Result<(), PublishError> {
        let event = WireResourceChanged {
            resource_kind: "company-officers",
            resource_uri: format!("/company/{company_number}/appointments/{appointment_id}"),
            context_id: &context.context_id,
            event_type: "changed",
            deleted_data: None,
        };
        self.post("/resource-changed", &event)
    }

    fn publish_deleted(
        &self,
        context: &RequestContext,
        company_number: &str,
        appointment_id: &str,
        snapshot: Value,
    ) -> Result<(), PublishError> {
        let event = WireResourceChanged {
            resource_kind: "company-officers",
            resource_uri: format!("/company/{company_number}/appointments/{appointment_id}"),
            context_id: &context.context_id,
            event_type: "deleted",
            deleted_data: Some(&snapshot),
        };
        self.post("/resource-changed", &event)
    }

    fn publish_officer_merge(
        &self,
        context: &RequestContext,
        officer_id: &str,
        previous_officer_id: &str,
    ) -> Result<(), PublishError> {
        let event = WireOfficerMerge {
            context_id: &context.context_id,
            officer_id,
            previous_officer_id,
        };
        self.post("/officer-merge", &event)
    }
}

/// Event captured by [`RecordingPublisher`].
#[derive(Debug, Clone, PartialEq)]
pub enum PublishedEvent {
    Changed {
        company_number: String,
        appointment_id: String,
    },
    Deleted {
        company_number: String,
        appointment_id: String,
        snapshot: Value,
    },
    Merge {
        officer_id: String,
        previous_officer_id: String,
    },
}

/// Publisher that records events in memory instead of sending them.
/// Optionally fails on demand so post-commit failure handling can be
/// exercised.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<PublishedEvent>>,
    fail_next: Mutex<Option<String>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PublishedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Make the next publish call fail with the given message.
    pub fn fail_next(&self, message: &str) {
        if let Ok(mut fail_next) = self.fail_next.lock() {
            *fail_next = Some(message.to_string());
        }
    }

    fn record(&self, event: PublishedEvent) -> Result<(), PublishError> {
        let failure = self
            .fail_next
            .lock()
            .map_err(|_| PublishError("event log lock poisoned".to_string()))?
            .take();
        if let Some(message) = failure {
            return Err(PublishError(message));
        }
        self.events
            .lock()
            .map_err(|_| PublishError("event log lock poisoned".to_string()))?
            .push(event);
        Ok(())
    }
}

impl NotificationPublisher for RecordingPublisher {
    fn publish_changed(
        &self,
        _context: &RequestContext,
        company_number: &str,
        appointment_id: &str,
    ) -> Result<(), PublishError> {
        self.record(PublishedEvent::Changed {
            company_number: company_number.to_string(),
            appointment_id: appointment_id.to_string(),
        })
    }

    fn publish_deleted(
        &self,
        _context: &RequestContext,
        company_number: &str,
        appointment_id: &str,
        snapshot: Value,
    ) -> Result<(), PublishError> {
        self.record(PublishedEvent::Deleted {
            company_number: company_number.to_string(),
            appointment_id: appointment_id.to_string(),
            snapshot,
        })
    }

    fn publish_officer_merge(
        &self,
        _context: &RequestContext,
        officer_id: &str,
        previous_officer_id: &str,
    ) -> Result<(), PublishError> {
        self.record(PublishedEvent::Merge {
            officer_id: officer_id.to_string(),
            previous_officer_id: previous_officer_id.to_string(),
        })
    }
}
