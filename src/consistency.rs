use crate::error::ServiceError;
use crate::logging::{LogLevel, RequestContext, ServiceLogger};
use crate::model::{AppointmentRecord, CompanyStatus, DeltaAt};
use crate::notification::NotificationPublisher;
use crate::profile::CompanyProfileSource;
use crate::store::{ListingQuery, RecordStore, SortKey};
use crate::summary::{deletion_snapshot, stub_deleted_snapshot};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Sentinel the delta pipeline writes into `previous_officer_id` when no
/// real predecessor exists. Never treated as an officer identity.
pub const PLACEHOLDER_PREVIOUS_OFFICER_ID: &str = "0000000000000000000000000000";

/// Wall-clock seam so bookkeeping timestamps are injectable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Counters tracking conflict and notification volume. Stale rejections are
/// routine under at-least-once delivery, so they get a counter rather than
/// error-level logs.
#[derive(Debug, Default)]
pub struct ConsistencyTelemetry {
    stale_deltas_total: AtomicU64,
    merges_total: AtomicU64,
    changed_events_total: AtomicU64,
    deleted_events_total: AtomicU64,
}

/// Point-in-time snapshot of the consistency counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsistencySnapshot {
    pub stale_deltas_total: u64,
    pub merges_total: u64,
    pub changed_events_total: u64,
    pub deleted_events_total: u64,
}

impl ConsistencyTelemetry {
    pub fn snapshot(&self) -> ConsistencySnapshot {
        ConsistencySnapshot {
            stale_deltas_total: self.stale_deltas_total.load(Ordering::Relaxed),
            merges_total: self.merges_total.load(Ordering::Relaxed),
            changed_events_total: self.changed_events_total.load(Ordering::Relaxed),
            deleted_events_total: self.deleted_events_total.load(Ordering::Relaxed),
        }
    }
}

/// Delta Consistency Engine: admits appointment deltas under the `delta_at`
/// version clock, keeps store writes and downstream notifications in the
/// commit-then-publish order, and emits officer-merge events when an
/// officer's identity changes.
pub struct ConsistencyEngine {
    store: Arc<dyn RecordStore>,
    publisher: Arc<dyn NotificationPublisher>,
    profile: Arc<dyn CompanyProfileSource>,
    clock: Arc<dyn Clock>,
    logger: Arc<ServiceLogger>,
    telemetry: ConsistencyTelemetry,
}

impl ConsistencyEngine {
    pub fn new(
        store: Arc<dyn RecordStore>,
        publisher: Arc<dyn NotificationPublisher>,
        profile: Arc<dyn CompanyProfileSource>,
        clock: Arc<dyn Clock>,
        logger: Arc<ServiceLogger>,
    ) -> Self {
        Self {
            store,
            publisher,
            profile,
            clock,
            logger,
            telemetry: ConsistencyTelemetry::default(),
        }
    }

    pub fn telemetry(&self) -> ConsistencySnapshot {
        self.telemetry.snapshot()
    }

    /// Admits one appointment delta.
    ///
    /// A delta strictly older than the stored record is rejected with
    /// `Conflict` and nothing is mutated; an equal one is re-admitted so
    /// replayed deliveries stay idempotent. Profile enrichment only runs for
    /// accepted deltas; the reject path performs no work beyond the lookup.
    /// The store write commits before any notification goes out, so a
    /// publish failure surfaces as `BadGateway` with the record already
    /// durable.
    pub fn upsert(
        &self,
        context: &RequestContext,
        mut incoming: AppointmentRecord,
    ) -> Result<(), ServiceError> {
        let existing = self
            .store
            .find(&incoming.company_number, &incoming.appointment_id)?;
        if let Some(ref existing) = existing {
            if incoming.delta_at.is_stale_against(existing.delta_at) {
                self.telemetry
                    .stale_deltas_total
                    .fetch_add(1, Ordering::Relaxed);
                self.logger.log(
                    LogLevel::Warn,
                    "delta_stale",
                    context,
                    Some(&incoming.company_number),
                    Some(&incoming.appointment_id),
                    &format!(
                        "incoming delta_at [{}] older than stored [{}]",
                        incoming.delta_at, existing.delta_at
                    ),
                );
                return Err(ServiceError::Conflict(format!(
                    "delta_at [{}] is older than the stored record",
                    incoming.delta_at
                )));
            }
        }

        self.enrich(context, &mut incoming);

        let now = self.clock.now();
        incoming.created = existing.as_ref().and_then(|record| record.created).or(Some(now));
        incoming.updated = Some(now);
        if incoming.updated_by.is_none() {
            incoming.updated_by = Some(context.context_id.clone());
        }
        let merge = self.resolve_officer_merge(existing.as_ref(), &incoming);
        // The record carries the resolved predecessor, not the raw delta
        // value: placeholder and self-referential ids are not identities.
        incoming.previous_officer_id = merge.clone();
        incoming.refresh_etag();

        let company_number = incoming.company_number.clone();
        let appointment_id = incoming.appointment_id.clone();
        let officer_id = incoming.officer_id.clone();
        self.store.save(incoming)?;

        if let Some(previous_officer_id) = merge {
            self.publisher
                .publish_officer_merge(context, &officer_id, &previous_officer_id)?;
            self.telemetry.merges_total.fetch_add(1, Ordering::Relaxed);
            self.logger.log(
                LogLevel::Info,
                "officer_merge",
                context,
                Some(&company_number),
                Some(&appointment_id),
                &format!("officer [{previous_officer_id}] merged into [{officer_id}]"),
            );
        }
        self.publisher
            .publish_changed(context, &company_number, &appointment_id)?;
        self.telemetry
            .changed_events_total
            .fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Removes one appointment, converging regardless of local state.
    ///
    /// The delta version is mandatory even though a missing record cannot be
    /// stale: without it the stale-delete protection below is meaningless.
    /// A delete for a record never held locally still emits a deletion event
    /// carrying the officer back-link stub so downstream views converge.
    pub fn delete(
        &self,
        context: &RequestContext,
        company_number: &str,
        appointment_id: &str,
        officer_id: &str,
        delta_at: Option<&str>,
    ) -> Result<(), ServiceError> {
        let delta_at = DeltaAt::parse(delta_at.unwrap_or_default())?;

        match self.store.find(company_number, appointment_id)? {
            Some(existing) => {
                if delta_at.is_stale_against(existing.delta_at) {
                    self.telemetry
                        .stale_deltas_total
                        .fetch_add(1, Ordering::Relaxed);
                    self.logger.log(
                        LogLevel::Warn,
                        "delete_stale",
                        context,
                        Some(company_number),
                        Some(appointment_id),
                        &format!(
                            "delete delta_at [{delta_at}] older than stored [{}]",
                            existing.delta_at
                        ),
                    );
                    return Err(ServiceError::Conflict(format!(
                        "delete delta_at [{delta_at}] is older than the stored record"
                    )));
                }
                self.store.delete(company_number, appointment_id)?;
                self.publisher.publish_deleted(
                    context,
                    company_number,
                    appointment_id,
                    deletion_snapshot(&existing),
                )?;
            }
            None => {
                self.logger.log(
                    LogLevel::Info,
                    "delete_missing",
                    context,
                    Some(company_number),
                    Some(appointment_id),
                    "delete for a record not held locally; emitting stub deletion",
                );
                self.publisher.publish_deleted(
                    context,
                    company_number,
                    appointment_id,
                    stub_deleted_snapshot(officer_id),
                )?;
            }
        }
        self.telemetry
            .deleted_events_total
            .fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Applies a company name/status correction across every appointment the
    /// company holds. The delta clock is untouched: this path corrects
    /// denormalized profile fields, it does not represent a newer delta.
    pub fn patch_company_info(
        &self,
        context: &RequestContext,
        company_number: &str,
        company_name: &str,
        company_status: &str,
    ) -> Result<(), ServiceError> {
        if company_name.trim().is_empty() {
            return Err(ServiceError::BadRequest(
                "company name must not be blank".to_string(),
            ));
        }
        if company_status.trim().is_empty() {
            return Err(ServiceError::BadRequest(
                "company status must not be blank".to_string(),
            ));
        }
        let status = CompanyStatus::parse(company_status).ok_or_else(|| {
            ServiceError::BadRequest(format!("invalid company status [{company_status}]"))
        })?;

        let page = self.store.query_company(
            company_number,
            &ListingQuery {
                sort: SortKey::Default,
                active_only: false,
                register_type: None,
                start_index: 0,
                items_per_page: usize::MAX,
            },
        )?;
        if page.items.is_empty() {
            return Err(ServiceError::NotFound(format!(
                "no appointments held for company [{company_number}]"
            )));
        }

        let now = self.clock.now();
        for mut record in page.items {
            record.company_name = Some(company_name.to_string());
            record.company_status = Some(status);
            record.updated = Some(now);
            record.refresh_etag();
            let appointment_id = record.appointment_id.clone();
            self.store.save(record)?;
            self.publisher
                .publish_changed(context, company_number, &appointment_id)?;
            self.telemetry
                .changed_events_total
                .fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    /// Best-effort profile enrichment. A missing or unreachable profile
    /// never fails ingestion; the fields stay as delivered.
    fn enrich(&self, context: &RequestContext, incoming: &mut AppointmentRecord) {
        match self.profile.fetch(&incoming.company_number) {
            Ok(profile) => {
                if profile.company_name.is_some() {
                    incoming.company_name = profile.company_name;
                }
                if profile.company_status.is_some() {
                    incoming.company_status = profile.company_status;
                }
            }
            Err(err) => {
                self.logger.log(
                    LogLevel::Warn,
                    "profile_enrichment_failed",
                    context,
                    Some(&incoming.company_number),
                    Some(&incoming.appointment_id),
                    &err.to_string(),
                );
            }
        }
    }

    /// Decides whether this delta changes the officer's identity. Only an
    /// update can merge: a first insert has no predecessor. The stored
    /// record's officer id wins over the delta's declared predecessor; blank
    /// and placeholder predecessors are not identities, and self-merges are
    /// meaningless.
    fn resolve_officer_merge(
        &self,
        existing: Option<&AppointmentRecord>,
        incoming: &AppointmentRecord,
    ) -> Option<String> {
        let existing = existing?;
        if existing.officer_id != incoming.officer_id && !existing.officer_id.trim().is_empty() {
            return Some(existing.officer_id.clone());
        }
        let declared = incoming.previous_officer_id.as_deref()?.trim();
        if declared.is_empty()
            || declared == incoming.officer_id
            || declared == PLACEHOLDER_PREVIOUS_OFFICER_ID
        {
            return None;
        }
        Some(declared.to_string())
    }
}
