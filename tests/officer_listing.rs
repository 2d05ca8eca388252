use chrono::NaiveDate;
use company_appointments::{
    AppointmentRecord, CompanyStatus, DeltaAt, InMemoryRecordStore, ListingEngine, OfficerData,
    PageLimits, RecordStore, RequestContext, ServiceError, ServiceLogger, StaticMetricsSource,
};
use std::sync::Arc;

fn record(company: &str, appointment: &str, officer: &str, appointed: (i32, u32, u32)) -> AppointmentRecord {
    AppointmentRecord {
        appointment_id: appointment.to_string(),
        company_number: company.to_string(),
        officer_id: officer.to_string(),
        previous_officer_id: None,
        internal_id: None,
        data: OfficerData {
            surname: Some("TAYLOR".to_string()),
            forename: Some("Sam".to_string()),
            officer_role: "director".to_string(),
            appointed_on: NaiveDate::from_ymd_opt(appointed.0, appointed.1, appointed.2),
            ..OfficerData::default()
        },
        sensitive_data: None,
        delta_at: DeltaAt::parse("20240101000000000000").unwrap(),
        created: None,
        updated: None,
        updated_by: None,
        etag: None,
        company_name: None,
        company_status: Some(CompanyStatus::Active),
        officer_role_sort_order: 10,
    }
}

struct Harness {
    engine: ListingEngine,
    store: Arc<InMemoryRecordStore>,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryRecordStore::new());
    let engine = ListingEngine::new(
        store.clone(),
        Arc::new(StaticMetricsSource::new()),
        Arc::new(ServiceLogger::default()),
        PageLimits::default(),
    );
    Harness { engine, store }
}

fn ctx() -> RequestContext {
    RequestContext::new("test-context")
}

#[test]
fn unknown_officer_is_not_found() {
    let h = harness();
    let err = h
        .engine
        .list_for_officer(&ctx(), "OF1", false, None, None)
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn officer_listing_spans_companies() {
    let h = harness();
    h.store.save(record("CO1", "AP1", "OF1", (2019, 3, 1))).unwrap();
    h.store.save(record("CO2", "AP2", "OF1", (2021, 6, 1))).unwrap();
    h.store.save(record("CO3", "AP3", "OF9", (2020, 1, 1))).unwrap();

    let listing = h
        .engine
        .list_for_officer(&ctx(), "OF1", false, None, None)
        .unwrap();
    assert_eq!(listing.total_results, 2);
    assert_eq!(listing.name, "TAYLOR, Sam");
    assert_eq!(listing.kind, "personal-appointment");
    assert_eq!(listing.links.self_link, "/officers/OF1/appointments");
}

#[test]
fn active_appointments_sort_ahead_of_resigned() {
    let h = harness();
    let mut resigned = record("CO1", "AP1", "OF1", (2022, 1, 1));
    resigned.data.resigned_on = NaiveDate::from_ymd_opt(2023, 1, 1);
    h.store.save(resigned).unwrap();
    h.store.save(record("CO2", "AP2", "OF1", (2018, 1, 1))).unwrap();

    let listing = h
        .engine
        .list_for_officer(&ctx(), "OF1", false, None, None)
        .unwrap();
    assert!(listing.items[0].resigned_on.is_none());
    assert!(listing.items[1].resigned_on.is_some());
}

#[test]
fn active_filter_excludes_resigned_and_closed_companies() {
    let h = harness();
    h.store.save(record("CO1", "AP1", "OF1", (2020, 1, 1))).unwrap();
    let mut resigned = record("CO2", "AP2", "OF1", (2020, 1, 1));
    resigned.data.resigned_on = NaiveDate::from_ymd_opt(2023, 1, 1);
    h.store.save(resigned).unwrap();
    let mut dissolved = record("CO3", "AP3", "OF1", (2020, 1, 1));
    dissolved.company_status = Some(CompanyStatus::Dissolved);
    h.store.save(dissolved).unwrap();

    let listing = h
        .engine
        .list_for_officer(&ctx(), "OF1", true, None, None)
        .unwrap();
    assert_eq!(listing.total_results, 1);
}

#[test]
fn officer_page_size_caps_at_fifty() {
    let h = harness();
    for idx in 0..60 {
        h.store
            .save(record(
                &format!("CO{idx:02}"),
                &format!("AP{idx:02}"),
                "OF1",
                (2020, 1, 1),
            ))
            .unwrap();
    }

    let listing = h
        .engine
        .list_for_officer(&ctx(), "OF1", false, None, Some(200))
        .unwrap();
    assert_eq!(listing.items_per_page, 50);
    assert_eq!(listing.items.len(), 50);
    assert_eq!(listing.total_results, 60);
}

#[test]
fn negative_officer_page_parameters_fold_to_magnitude() {
    let h = harness();
    for idx in 0..10 {
        h.store
            .save(record(
                &format!("CO{idx:02}"),
                &format!("AP{idx:02}"),
                "OF1",
                (2020, 1, 1),
            ))
            .unwrap();
    }

    let listing = h
        .engine
        .list_for_officer(&ctx(), "OF1", false, Some(-2), Some(-4))
        .unwrap();
    assert_eq!(listing.start_index, 2);
    assert_eq!(listing.items_per_page, 4);
    assert_eq!(listing.items.len(), 4);
}
