use crate::error::ServiceError;
use crate::logging::{LogLevel, RequestContext, ServiceLogger};
use crate::metrics_source::{CompanyMetrics, MetricsSource};
use crate::model::RegisterType;
use crate::store::{ListingQuery, OfficerQuery, RecordStore, SortKey};
use crate::summary::{display_name, summarize, OfficerSummary};
use serde::Serialize;
use std::sync::Arc;

/// Page defaults for company listings.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 35;
pub const MAX_ITEMS_PER_PAGE: usize = 100;

/// Page cap for officer-centric listings, which fan out across companies.
pub const MAX_OFFICER_ITEMS_PER_PAGE: usize = 50;

/// Pagination limits, overridable through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_items_per_page: usize,
    pub max_items_per_page: usize,
    pub max_officer_items_per_page: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_items_per_page: DEFAULT_ITEMS_PER_PAGE,
            max_items_per_page: MAX_ITEMS_PER_PAGE,
            max_officer_items_per_page: MAX_OFFICER_ITEMS_PER_PAGE,
        }
    }
}

/// Parameters of a company appointment listing request.
#[derive(Debug, Clone, Default)]
pub struct FetchAppointmentsRequest {
    pub company_number: String,
    pub order_by: Option<String>,
    pub register_view: bool,
    pub register_type: Option<String>,
    pub filter_active: bool,
    pub start_index: Option<i64>,
    pub items_per_page: Option<i64>,
}

impl FetchAppointmentsRequest {
    pub fn new(company_number: &str) -> Self {
        Self {
            company_number: company_number.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListLinks {
    #[serde(rename = "self")]
    pub self_link: String,
}

/// Company appointment listing: authoritative counts plus the redacted,
/// sorted page of appointment summaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppointmentList {
    pub active_count: u32,
    pub inactive_count: u32,
    pub resigned_count: u32,
    pub total_results: u32,
    pub items: Vec<OfficerSummary>,
    pub start_index: usize,
    pub items_per_page: usize,
    pub kind: String,
    pub links: ListLinks,
}

/// Cross-company appointment listing for one officer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OfficerAppointmentList {
    pub name: String,
    pub total_results: usize,
    pub items: Vec<OfficerSummary>,
    pub start_index: usize,
    pub items_per_page: usize,
    pub kind: String,
    pub links: ListLinks,
}

/// Appointment Aggregation Engine: combines store queries with
/// metrics-source counts into consistent, redacted listings. Counts always
/// come from the metrics source, never from counting stored rows, so
/// listings agree with the wider registry even mid-reindex.
pub struct ListingEngine {
    store: Arc<dyn RecordStore>,
    metrics: Arc<dyn MetricsSource>,
    logger: Arc<ServiceLogger>,
    page_limits: PageLimits,
}

impl ListingEngine {
    pub fn new(
        store: Arc<dyn RecordStore>,
        metrics: Arc<dyn MetricsSource>,
        logger: Arc<ServiceLogger>,
        page_limits: PageLimits,
    ) -> Self {
        Self {
            store,
            metrics,
            logger,
            page_limits,
        }
    }

    /// Lists a company's appointments per the request parameters.
    pub fn list(
        &self,
        context: &RequestContext,
        request: &FetchAppointmentsRequest,
    ) -> Result<AppointmentList, ServiceError> {
        let sort = SortKey::parse(request.order_by.as_deref()).ok_or_else(|| {
            ServiceError::BadRequest(format!(
                "invalid order_by [{}]",
                request.order_by.as_deref().unwrap_or_default()
            ))
        })?;

        let metrics = self.metrics.fetch(&request.company_number)?;

        let register_type = if request.register_view {
            let raw = request.register_type.as_deref().unwrap_or_default();
            let register_type = RegisterType::parse(raw).ok_or_else(|| {
                ServiceError::BadRequest(format!("invalid register type [{raw}]"))
            })?;
            if !metrics.registers.is_public(register_type) {
                self.logger.log(
                    LogLevel::Info,
                    "register_not_public",
                    context,
                    Some(&request.company_number),
                    None,
                    &format!("register [{register_type}] is not held publicly"),
                );
                return Err(ServiceError::NotFound(format!(
                    "register [{register_type}] for company [{}] is not held publicly",
                    request.company_number
                )));
            }
            Some(register_type)
        } else {
            None
        };

        let (start_index, items_per_page) = normalize_page(
            request.start_index,
            request.items_per_page,
            self.page_limits.default_items_per_page,
            self.page_limits.max_items_per_page,
        );
        let page = self.store.query_company(
            &request.company_number,
            &ListingQuery {
                sort,
                active_only: request.filter_active || request.register_view,
                register_type,
                start_index,
                items_per_page,
            },
        )?;
        if page.items.is_empty() {
            return Err(ServiceError::NotFound(format!(
                "no appointments found for company [{}]",
                request.company_number
            )));
        }

        let counts = compute_counts(&metrics, &page.items, register_type, request.filter_active);
        let items = page
            .items
            .iter()
            .map(|record| summarize(record, request.register_view))
            .collect();

        Ok(AppointmentList {
            active_count: counts.active,
            inactive_count: counts.inactive,
            resigned_count: counts.resigned,
            total_results: counts.total,
            items,
            start_index,
            items_per_page,
            kind: "officer-list".to_string(),
            links: ListLinks {
                self_link: format!("/company/{}/officers", request.company_number),
            },
        })
    }

    /// Lists every appointment held by one officer across companies.
    ///
    /// One aggregated query serves both the filtered and unfiltered form;
    /// an officer the store has never seen is NotFound rather than an empty
    /// list.
    pub fn list_for_officer(
        &self,
        _context: &RequestContext,
        officer_id: &str,
        active_only: bool,
        start_index: Option<i64>,
        items_per_page: Option<i64>,
    ) -> Result<OfficerAppointmentList, ServiceError> {
        let first = self
            .store
            .find_first_by_officer(officer_id)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("no appointments held for officer [{officer_id}]"))
            })?;

        let (start_index, items_per_page) = normalize_page(
            start_index,
            items_per_page,
            self.page_limits.default_items_per_page,
            self.page_limits.max_officer_items_per_page,
        );
        let page = self.store.query_officer(
            officer_id,
            &OfficerQuery {
                active_only,
                start_index,
                items_per_page,
            },
        )?;

        let items = page
            .items
            .iter()
            .map(|record| summarize(record, false))
            .collect();
        Ok(OfficerAppointmentList {
            name: display_name(&first),
            total_results: page.total_results,
            items,
            start_index,
            items_per_page,
            kind: "personal-appointment".to_string(),
            links: ListLinks {
                self_link: format!("/officers/{officer_id}/appointments"),
            },
        })
    }

    /// Point fetch of a single appointment's public view.
    pub fn get(
        &self,
        company_number: &str,
        appointment_id: &str,
    ) -> Result<OfficerSummary, ServiceError> {
        let record = self
            .store
            .find(company_number, appointment_id)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "appointment [{appointment_id}] not found for company [{company_number}]"
                ))
            })?;
        Ok(summarize(&record, false))
    }
}

struct Counts {
    active: u32,
    inactive: u32,
    resigned: u32,
    total: u32,
}

/// Count semantics: register views report the register's own active count
/// and never include resigned officers. Outside register view, a company in
/// the closed status class has its metrics "active" bucket reinterpreted as
/// inactive, and an active-only filter narrows the total to the active
/// count.
fn compute_counts(
    metrics: &CompanyMetrics,
    items: &[crate::model::AppointmentRecord],
    register_type: Option<RegisterType>,
    filter_active: bool,
) -> Counts {
    if let Some(register_type) = register_type {
        let register_active = match register_type {
            RegisterType::Directors => metrics.active_directors_count,
            RegisterType::Secretaries => metrics.active_secretaries_count,
            RegisterType::LlpMembers => metrics.active_llp_members_count,
        };
        return Counts {
            active: register_active,
            inactive: 0,
            resigned: 0,
            total: register_active,
        };
    }

    let closed_class = items
        .first()
        .and_then(|record| record.company_status)
        .map(|status| status.is_closed_class())
        .unwrap_or(false);
    if closed_class {
        Counts {
            active: 0,
            inactive: metrics.active_count,
            resigned: metrics.resigned_count,
            total: if filter_active { 0 } else { metrics.total_count },
        }
    } else {
        Counts {
            active: metrics.active_count,
            inactive: 0,
            resigned: metrics.resigned_count,
            total: if filter_active {
                metrics.active_count
            } else {
                metrics.total_count
            },
        }
    }
}

/// Normalizes pagination: negatives are folded to their magnitude, zero or
/// absent page sizes fall back to the default, and page sizes clamp to the
/// endpoint's cap.
fn normalize_page(
    start_index: Option<i64>,
    items_per_page: Option<i64>,
    default: usize,
    cap: usize,
) -> (usize, usize) {
    let start_index = start_index.map(|value| value.unsigned_abs() as usize).unwrap_or(0);
    let items_per_page = match items_per_page {
        None | Some(0) => default,
        Some(value) => (value.unsigned_abs() as usize).min(cap),
    };
    (start_index, items_per_page)
}
