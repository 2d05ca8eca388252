use crate::model::{AppointmentRecord, RegisterType};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Sort dimension requested for a company listing.
///
/// `Default` is the compound order used when the request names no sort key:
/// role priority ascending (precomputed sort order), then surname, then
/// forename, then appointment date descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Default,
    AppointedOn,
    Surname,
    ResignedOn,
}

impl SortKey {
    /// Maps the `order_by` request parameter. `None` selects the compound
    /// default; unknown values are a client error reported by the caller.
    pub fn parse(order_by: Option<&str>) -> Option<Self> {
        match order_by {
            None => Some(Self::Default),
            Some("appointed_on") => Some(Self::AppointedOn),
            Some("surname") => Some(Self::Surname),
            Some("resigned_on") => Some(Self::ResignedOn),
            Some(_) => None,
        }
    }
}

/// Query pushed down to the store for a company-level listing.
#[derive(Debug, Clone)]
pub struct ListingQuery {
    pub sort: SortKey,
    pub active_only: bool,
    pub register_type: Option<RegisterType>,
    pub start_index: usize,
    pub items_per_page: usize,
}

/// Query pushed down to the store for an officer-centric listing.
#[derive(Debug, Clone)]
pub struct OfficerQuery {
    pub active_only: bool,
    pub start_index: usize,
    pub items_per_page: usize,
}

/// One page of query results plus the pre-pagination match count.
#[derive(Debug, Clone, Default)]
pub struct QueryPage {
    pub total_results: usize,
    pub items: Vec<AppointmentRecord>,
}

/// Store failures split by retryability: transient failures are safe to
/// retry as a whole operation, persistent ones are not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("transient store failure: {0}")]
    Transient(String),
    #[error("persistent store failure: {0}")]
    Persistent(String),
}

/// Record Store Adapter: point lookups, writes, and listing queries over the
/// canonical appointment documents. No business logic lives here; the
/// engines rely on read-your-write consistency for their read-then-write
/// sequences.
pub trait RecordStore: Send + Sync {
    fn find(
        &self,
        company_number: &str,
        appointment_id: &str,
    ) -> Result<Option<AppointmentRecord>, StoreError>;

    fn save(&self, record: AppointmentRecord) -> Result<(), StoreError>;

    fn delete(&self, company_number: &str, appointment_id: &str) -> Result<(), StoreError>;

    fn query_company(
        &self,
        company_number: &str,
        query: &ListingQuery,
    ) -> Result<QueryPage, StoreError>;

    fn find_first_by_officer(
        &self,
        officer_id: &str,
    ) -> Result<Option<AppointmentRecord>, StoreError>;

    fn query_officer(&self, officer_id: &str, query: &OfficerQuery)
        -> Result<QueryPage, StoreError>;
}

/// In-memory store keyed by (company number, appointment id).
///
/// The per-call mutex doubles as the per-id critical section the engines
/// need when no conditional-update primitive is available.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: Mutex<BTreeMap<(String, String), AppointmentRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<MutexGuard<'_, BTreeMap<(String, String), AppointmentRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Persistent("record store lock poisoned".to_string()))
    }

    /// Number of records currently held (tests, diagnostics).
    pub fn len(&self) -> usize {
        self.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for InMemoryRecordStore {
    fn find(
        &self,
        company_number: &str,
        appointment_id: &str,
    ) -> Result<Option<AppointmentRecord>, StoreError> {
        let records = self.lock()?;
        Ok(records
            .get(&(company_number.to_string(), appointment_id.to_string()))
            .cloned())
    }

    fn save(&self, record: AppointmentRecord) -> Result<(), StoreError> {
        let mut records = self.lock()?;
        records.insert(
            (record.company_number.clone(), record.appointment_id.clone()),
            record,
        );
        Ok(())
    }

    fn delete(&self, company_number: &str, appointment_id: &str) -> Result<(), StoreError> {
        let mut records = self.lock()?;
        records.remove(&(company_number.to_string(), appointment_id.to_string()));
        Ok(())
    }

    fn query_company(
        &self,
        company_number: &str,
        query: &ListingQuery,
    ) -> Result<QueryPage, StoreError> {
        let records = self.lock()?;
        let mut matches: Vec<AppointmentRecord> = records
            .values()
            .filter(|record| record.company_number == company_number)
            .filter(|record| !query.active_only || record.is_active())
            .filter(|record| match query.register_type {
                Some(register_type) => register_type.matches_role(&record.data.officer_role),
                None => true,
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| compare_records(a, b, query.sort));
        Ok(paginate(matches, query.start_index, query.items_per_page))
    }

    fn find_first_by_officer(
        &self,
        officer_id: &str,
    ) -> Result<Option<AppointmentRecord>, StoreError> {
        let records = self.lock()?;
        Ok(records
            .values()
            .find(|record| record.officer_id == officer_id)
            .cloned())
    }

    fn query_officer(
        &self,
        officer_id: &str,
        query: &OfficerQuery,
    ) -> Result<QueryPage, StoreError> {
        let records = self.lock()?;
        let mut matches: Vec<AppointmentRecord> = records
            .values()
            .filter(|record| record.officer_id == officer_id)
            .filter(|record| {
                if !query.active_only {
                    return true;
                }
                let company_closed = record
                    .company_status
                    .map(|status| status.is_closed_class())
                    .unwrap_or(false);
                record.is_active() && !company_closed
            })
            .cloned()
            .collect();
        matches.sort_by(compare_officer_records);
        Ok(paginate(matches, query.start_index, query.items_per_page))
    }
}

fn paginate(matches: Vec<AppointmentRecord>, start_index: usize, items_per_page: usize) -> QueryPage {
    let total_results = matches.len();
    let items = matches
        .into_iter()
        .skip(start_index)
        .take(items_per_page)
        .collect();
    QueryPage {
        total_results,
        items,
    }
}

fn compare_records(a: &AppointmentRecord, b: &AppointmentRecord, sort: SortKey) -> Ordering {
    match sort {
        SortKey::Default => a
            .officer_role_sort_order
            .cmp(&b.officer_role_sort_order)
            .then_with(|| a.surname_sort_key().cmp(b.surname_sort_key()))
            .then_with(|| a.data.forename.cmp(&b.data.forename))
            .then_with(|| {
                b.appointment_date_sort_key()
                    .cmp(&a.appointment_date_sort_key())
            }),
        SortKey::AppointedOn => b
            .appointment_date_sort_key()
            .cmp(&a.appointment_date_sort_key()),
        SortKey::Surname => a.surname_sort_key().cmp(b.surname_sort_key()),
        SortKey::ResignedOn => b.data.resigned_on.cmp(&a.data.resigned_on),
    }
}

/// Officer-centric order: active appointments ahead of resigned ones, then
/// most recent appointment date first.
fn compare_officer_records(a: &AppointmentRecord, b: &AppointmentRecord) -> Ordering {
    let resigned_rank = |record: &AppointmentRecord| usize::from(!record.is_active());
    resigned_rank(a).cmp(&resigned_rank(b)).then_with(|| {
        b.appointment_date_sort_key()
            .cmp(&a.appointment_date_sort_key())
    })
}
