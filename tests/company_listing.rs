use chrono::NaiveDate;
use company_appointments::{
    AppointmentRecord, CompanyMetrics, CompanyStatus, DeltaAt, FetchAppointmentsRequest,
    InMemoryRecordStore, ListingEngine, OfficerData, PageLimits, RecordStore, RegisterStatus,
    RequestContext, ServiceError, ServiceLogger, StaticMetricsSource,
};
use std::sync::Arc;

fn record(appointment: &str, surname: &str, role: &str, sort_order: i32) -> AppointmentRecord {
    AppointmentRecord {
        appointment_id: appointment.to_string(),
        company_number: "CO1".to_string(),
        officer_id: format!("OF-{appointment}"),
        previous_officer_id: None,
        internal_id: None,
        data: OfficerData {
            surname: Some(surname.to_string()),
            forename: Some("Alex".to_string()),
            officer_role: role.to_string(),
            appointed_on: NaiveDate::from_ymd_opt(2020, 1, 1),
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
        officer_role_sort_order: sort_order,
    }
}

fn metrics(active: u32, resigned: u32, total: u32) -> CompanyMetrics {
    CompanyMetrics {
        active_count: active,
        resigned_count: resigned,
        total_count: total,
        ..CompanyMetrics::default()
    }
}

struct Harness {
    engine: ListingEngine,
    store: Arc<InMemoryRecordStore>,
    metrics: Arc<StaticMetricsSource>,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryRecordStore::new());
    let metrics = Arc::new(StaticMetricsSource::new());
    let engine = ListingEngine::new(
        store.clone(),
        metrics.clone(),
        Arc::new(ServiceLogger::default()),
        PageLimits::default(),
    );
    Harness {
        engine,
        store,
        metrics,
    }
}

fn ctx() -> RequestContext {
    RequestContext::new("test-context")
}

#[test]
fn listing_reports_metrics_counts_not_row_counts() {
    let h = harness();
    h.store.save(record("AP1", "SMITH", "director", 10)).unwrap();
    h.metrics.insert("CO1", metrics(7, 3, 10));

    let listing = h
        .engine
        .list(&ctx(), &FetchAppointmentsRequest::new("CO1"))
        .unwrap();
    assert_eq!(listing.active_count, 7);
    assert_eq!(listing.resigned_count, 3);
    assert_eq!(listing.total_results, 10);
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.kind, "officer-list");
    assert_eq!(listing.links.self_link, "/company/CO1/officers");
}

#[test]
fn dissolved_company_reinterprets_active_as_inactive() {
    let h = harness();
    let mut dissolved = record("AP1", "SMITH", "director", 10);
    dissolved.company_status = Some(CompanyStatus::Dissolved);
    h.store.save(dissolved).unwrap();
    h.metrics.insert("CO1", metrics(5, 2, 7));

    let mut request = FetchAppointmentsRequest::new("CO1");
    request.filter_active = true;
    let listing = h.engine.list(&ctx(), &request).unwrap();
    assert_eq!(listing.active_count, 0);
    assert_eq!(listing.inactive_count, 5);
    assert_eq!(listing.resigned_count, 2);
    assert_eq!(listing.total_results, 0);
}

#[test]
fn active_filter_narrows_total_to_active_count() {
    let h = harness();
    h.store.save(record("AP1", "SMITH", "director", 10)).unwrap();
    h.metrics.insert("CO1", metrics(4, 6, 10));

    let mut request = FetchAppointmentsRequest::new("CO1");
    request.filter_active = true;
    let listing = h.engine.list(&ctx(), &request).unwrap();
    assert_eq!(listing.total_results, 4);
}

#[test]
fn active_filter_excludes_resigned_rows() {
    let h = harness();
    h.store.save(record("AP1", "SMITH", "director", 10)).unwrap();
    let mut resigned = record("AP2", "JONES", "director", 10);
    resigned.data.resigned_on = NaiveDate::from_ymd_opt(2023, 5, 1);
    h.store.save(resigned).unwrap();
    h.metrics.insert("CO1", metrics(1, 1, 2));

    let mut request = FetchAppointmentsRequest::new("CO1");
    request.filter_active = true;
    let listing = h.engine.list(&ctx(), &request).unwrap();
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.items[0].name, "SMITH, Alex");
}

#[test]
fn unknown_order_by_is_a_bad_request() {
    let h = harness();
    h.metrics.insert("CO1", metrics(1, 0, 1));
    let mut request = FetchAppointmentsRequest::new("CO1");
    request.order_by = Some("nationality".to_string());
    let err = h.engine.list(&ctx(), &request).unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(_)));
}

#[test]
fn company_unknown_to_metrics_is_not_found() {
    let h = harness();
    h.store.save(record("AP1", "SMITH", "director", 10)).unwrap();
    let err = h
        .engine
        .list(&ctx(), &FetchAppointmentsRequest::new("CO1"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn empty_result_set_is_not_found() {
    let h = harness();
    h.metrics.insert("CO1", metrics(0, 0, 0));
    let err = h
        .engine
        .list(&ctx(), &FetchAppointmentsRequest::new("CO1"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn default_sort_orders_by_role_then_surname() {
    let h = harness();
    h.store.save(record("AP1", "ZULU", "director", 10)).unwrap();
    h.store.save(record("AP2", "ABLE", "director", 10)).unwrap();
    h.store.save(record("AP3", "MIDDLE", "secretary", 20)).unwrap();
    h.metrics.insert("CO1", metrics(3, 0, 3));

    let listing = h
        .engine
        .list(&ctx(), &FetchAppointmentsRequest::new("CO1"))
        .unwrap();
    let names: Vec<_> = listing.items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["ABLE, Alex", "ZULU, Alex", "MIDDLE, Alex"]);
}

#[test]
fn pagination_defaults_and_caps_apply() {
    let h = harness();
    for idx in 0..40 {
        h.store
            .save(record(&format!("AP{idx:02}"), "SMITH", "director", 10))
            .unwrap();
    }
    h.metrics.insert("CO1", metrics(40, 0, 40));

    let listing = h
        .engine
        .list(&ctx(), &FetchAppointmentsRequest::new("CO1"))
        .unwrap();
    assert_eq!(listing.items.len(), 35);
    assert_eq!(listing.items_per_page, 35);

    let mut request = FetchAppointmentsRequest::new("CO1");
    request.items_per_page = Some(500);
    let listing = h.engine.list(&ctx(), &request).unwrap();
    assert_eq!(listing.items_per_page, 100);
    assert_eq!(listing.items.len(), 40);
}

#[test]
fn negative_pagination_parameters_fold_to_magnitude() {
    let h = harness();
    for idx in 0..10 {
        h.store
            .save(record(&format!("AP{idx:02}"), "SMITH", "director", 10))
            .unwrap();
    }
    h.metrics.insert("CO1", metrics(10, 0, 10));

    let mut request = FetchAppointmentsRequest::new("CO1");
    request.start_index = Some(-5);
    request.items_per_page = Some(-3);
    let listing = h.engine.list(&ctx(), &request).unwrap();
    assert_eq!(listing.start_index, 5);
    assert_eq!(listing.items_per_page, 3);
    assert_eq!(listing.items.len(), 3);
}

#[test]
fn point_fetch_returns_redacted_view_or_not_found() {
    let h = harness();
    h.store.save(record("AP1", "SMITH", "director", 10)).unwrap();

    let summary = h.engine.get("CO1", "AP1").unwrap();
    assert_eq!(summary.name, "SMITH, Alex");

    let err = h.engine.get("CO1", "AP9").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn register_view_requires_public_register() {
    let h = harness();
    h.store.save(record("AP1", "SMITH", "director", 10)).unwrap();
    h.metrics.insert("CO1", metrics(1, 0, 1));

    let mut request = FetchAppointmentsRequest::new("CO1");
    request.register_view = true;
    request.register_type = Some("directors".to_string());
    let err = h.engine.list(&ctx(), &request).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn register_view_rejects_unknown_register_type() {
    let h = harness();
    h.metrics.insert("CO1", metrics(1, 0, 1));
    let mut request = FetchAppointmentsRequest::new("CO1");
    request.register_view = true;
    request.register_type = Some("members".to_string());
    let err = h.engine.list(&ctx(), &request).unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(_)));
}

#[test]
fn register_view_filters_to_role_class_and_zeroes_resigned() {
    let h = harness();
    h.store.save(record("AP1", "SMITH", "director", 10)).unwrap();
    h.store.save(record("AP2", "JONES", "secretary", 20)).unwrap();
    let mut resigned = record("AP3", "OLD", "director", 10);
    resigned.data.resigned_on = NaiveDate::from_ymd_opt(2022, 1, 1);
    h.store.save(resigned).unwrap();
    h.metrics.insert(
        "CO1",
        CompanyMetrics {
            active_count: 2,
            resigned_count: 1,
            total_count: 3,
            active_directors_count: 1,
            registers: RegisterStatus {
                directors_register_moved_to: Some("public-register".to_string()),
                ..RegisterStatus::default()
            },
            ..CompanyMetrics::default()
        },
    );

    let mut request = FetchAppointmentsRequest::new("CO1");
    request.register_view = true;
    request.register_type = Some("directors".to_string());
    let listing = h.engine.list(&ctx(), &request).unwrap();
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.items[0].name, "SMITH, Alex");
    assert_eq!(listing.active_count, 1);
    assert_eq!(listing.total_results, 1);
    assert_eq!(listing.resigned_count, 0);
}
