use chrono::NaiveDate;
use company_appointments::{
    AppointmentRecord, DeltaAt, InMemoryRecordStore, ListingQuery, OfficerData, RecordStore,
    RegisterType, SortKey,
};

fn record(appointment: &str, data: OfficerData, sort_order: i32) -> AppointmentRecord {
    AppointmentRecord {
        appointment_id: appointment.to_string(),
        company_number: "CO1".to_string(),
        officer_id: format!("OF-{appointment}"),
        previous_officer_id: None,
        internal_id: None,
        data,
        sensitive_data: None,
        delta_at: DeltaAt::parse("20240101000000000000").unwrap(),
        created: None,
        updated: None,
        updated_by: None,
        etag: None,
        company_name: None,
        company_status: None,
        officer_role_sort_order: sort_order,
    }
}

fn person(surname: &str, forename: &str, role: &str, appointed: (i32, u32, u32)) -> OfficerData {
    OfficerData {
        surname: Some(surname.to_string()),
        forename: Some(forename.to_string()),
        officer_role: role.to_string(),
        appointed_on: NaiveDate::from_ymd_opt(appointed.0, appointed.1, appointed.2),
        ..OfficerData::default()
    }
}

fn query(sort: SortKey) -> ListingQuery {
    ListingQuery {
        sort,
        active_only: false,
        register_type: None,
        start_index: 0,
        items_per_page: 100,
    }
}

#[test]
fn sort_key_parse_accepts_only_known_dimensions() {
    assert_eq!(SortKey::parse(None), Some(SortKey::Default));
    assert_eq!(SortKey::parse(Some("appointed_on")), Some(SortKey::AppointedOn));
    assert_eq!(SortKey::parse(Some("surname")), Some(SortKey::Surname));
    assert_eq!(SortKey::parse(Some("resigned_on")), Some(SortKey::ResignedOn));
    assert_eq!(SortKey::parse(Some("forename")), None);
}

#[test]
fn default_sort_breaks_surname_ties_on_forename_then_date() {
    let store = InMemoryRecordStore::new();
    store
        .save(record("AP1", person("SMITH", "Zara", "director", (2020, 1, 1)), 10))
        .unwrap();
    store
        .save(record("AP2", person("SMITH", "Adam", "director", (2020, 1, 1)), 10))
        .unwrap();
    let mut newer = record("AP3", person("SMITH", "Adam", "director", (2022, 1, 1)), 10);
    newer.officer_id = "OF-other".to_string();
    store.save(newer).unwrap();

    let page = store.query_company("CO1", &query(SortKey::Default)).unwrap();
    let ids: Vec<_> = page
        .items
        .iter()
        .map(|record| record.appointment_id.as_str())
        .collect();
    assert_eq!(ids, vec!["AP3", "AP2", "AP1"]);
}

#[test]
fn appointed_before_stands_in_for_missing_appointment_date() {
    let store = InMemoryRecordStore::new();
    let mut pre_1992 = record("AP1", person("OLD", "Ada", "director", (2020, 1, 1)), 10);
    pre_1992.data.appointed_on = None;
    pre_1992.data.appointed_before = NaiveDate::from_ymd_opt(1991, 6, 1);
    store.save(pre_1992).unwrap();
    store
        .save(record("AP2", person("NEW", "Bea", "director", (2015, 1, 1)), 10))
        .unwrap();

    let page = store
        .query_company("CO1", &query(SortKey::AppointedOn))
        .unwrap();
    assert_eq!(page.items[0].appointment_id, "AP2");
    assert_eq!(page.items[1].appointment_id, "AP1");
}

#[test]
fn resigned_sort_is_descending_with_active_last() {
    let store = InMemoryRecordStore::new();
    let mut early = record("AP1", person("A", "A", "director", (2010, 1, 1)), 10);
    early.data.resigned_on = NaiveDate::from_ymd_opt(2020, 1, 1);
    store.save(early).unwrap();
    let mut late = record("AP2", person("B", "B", "director", (2010, 1, 1)), 10);
    late.data.resigned_on = NaiveDate::from_ymd_opt(2023, 1, 1);
    store.save(late).unwrap();
    store
        .save(record("AP3", person("C", "C", "director", (2010, 1, 1)), 10))
        .unwrap();

    let page = store
        .query_company("CO1", &query(SortKey::ResignedOn))
        .unwrap();
    let ids: Vec<_> = page
        .items
        .iter()
        .map(|record| record.appointment_id.as_str())
        .collect();
    assert_eq!(ids, vec!["AP2", "AP1", "AP3"]);
}

#[test]
fn corporate_officers_sort_by_company_name() {
    let store = InMemoryRecordStore::new();
    let mut corporate = record("AP1", person("", "", "corporate-director", (2020, 1, 1)), 10);
    corporate.data.surname = None;
    corporate.data.forename = None;
    corporate.data.company_name = Some("AARDVARK NOMINEES".to_string());
    store.save(corporate).unwrap();
    store
        .save(record("AP2", person("ZEBRA", "Z", "director", (2020, 1, 1)), 10))
        .unwrap();

    let page = store.query_company("CO1", &query(SortKey::Surname)).unwrap();
    assert_eq!(page.items[0].appointment_id, "AP1");
}

#[test]
fn register_filter_restricts_to_role_class() {
    let store = InMemoryRecordStore::new();
    store
        .save(record("AP1", person("A", "A", "director", (2020, 1, 1)), 10))
        .unwrap();
    store
        .save(record("AP2", person("B", "B", "secretary", (2020, 1, 1)), 20))
        .unwrap();
    store
        .save(record("AP3", person("C", "C", "llp-member", (2020, 1, 1)), 30))
        .unwrap();

    let mut filtered = query(SortKey::Default);
    filtered.register_type = Some(RegisterType::Secretaries);
    let page = store.query_company("CO1", &filtered).unwrap();
    assert_eq!(page.total_results, 1);
    assert_eq!(page.items[0].appointment_id, "AP2");
}

#[test]
fn total_results_counts_matches_before_pagination() {
    let store = InMemoryRecordStore::new();
    for idx in 0..8 {
        store
            .save(record(
                &format!("AP{idx}"),
                person("S", "F", "director", (2020, 1, 1)),
                10,
            ))
            .unwrap();
    }

    let mut paged = query(SortKey::Default);
    paged.start_index = 5;
    paged.items_per_page = 2;
    let page = store.query_company("CO1", &paged).unwrap();
    assert_eq!(page.total_results, 8);
    assert_eq!(page.items.len(), 2);

    paged.start_index = 50;
    let page = store.query_company("CO1", &paged).unwrap();
    assert_eq!(page.total_results, 8);
    assert!(page.items.is_empty());
}
