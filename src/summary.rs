use crate::model::{
    Address, AppointmentRecord, ContactDetails, FormerName, Identification, ItemLinks,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Honorifics dropped from display names. Anything else (Dr, Sir, Baroness)
/// is kept as a meaningful suffix.
const DROPPED_TITLES: [&str; 5] = ["mr", "mrs", "miss", "ms", "master"];

/// Date of birth as disclosed in listings. The day is only present in
/// register views; everywhere else disclosure stops at month and year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateOfBirthView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    pub month: u32,
    pub year: i32,
}

/// Public listing view of one appointment, after redaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OfficerSummary {
    pub name: String,
    pub officer_role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointed_on: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointed_before: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resigned_on: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pre_1992_appointment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<DateOfBirthView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_of_residence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_office_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_details: Option<ContactDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification: Option<Identification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub former_names: Option<Vec<FormerName>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ItemLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

/// Maps a stored record into its public listing view, applying the
/// disclosure rules: secretarial roles lose country of residence and date
/// of birth entirely, and the date-of-birth day is only disclosed inside a
/// register view.
pub fn summarize(record: &AppointmentRecord, register_view: bool) -> OfficerSummary {
    let secretarial = crate::model::is_secretary(&record.data.officer_role);
    let date_of_birth = if secretarial {
        None
    } else {
        record
            .sensitive_data
            .as_ref()
            .and_then(|sensitive| sensitive.date_of_birth)
            .map(|dob| DateOfBirthView {
                day: if register_view { dob.day } else { None },
                month: dob.month,
                year: dob.year,
            })
    };
    OfficerSummary {
        name: display_name(record),
        officer_role: record.data.officer_role.clone(),
        appointed_on: record.data.appointed_on,
        appointed_before: record.data.appointed_before,
        resigned_on: record.data.resigned_on,
        is_pre_1992_appointment: record.data.is_pre_1992_appointment,
        date_of_birth,
        nationality: record.data.nationality.clone(),
        occupation: record.data.occupation.clone(),
        country_of_residence: if secretarial {
            None
        } else {
            record.data.country_of_residence.clone()
        },
        responsibilities: record.data.responsibilities.clone(),
        address: record.data.service_address.clone(),
        principal_office_address: record.data.principal_office_address.clone(),
        contact_details: record.data.contact_details.clone(),
        identification: record.data.identification.clone(),
        former_names: record.data.former_names.clone(),
        links: record.data.links.clone(),
        person_number: record.data.person_number.clone(),
        etag: record.etag.clone(),
    }
}

/// Display name: corporate officers show their company name; individuals
/// show "Surname, Forename Other, Title" with common honorifics dropped.
pub fn display_name(record: &AppointmentRecord) -> String {
    if let Some(company_name) = record.data.company_name.as_deref() {
        return company_name.to_string();
    }
    let mut name = record.data.surname.clone().unwrap_or_default();
    let forenames = [
        record.data.forename.as_deref(),
        record.data.other_forenames.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");
    if !forenames.is_empty() {
        if !name.is_empty() {
            name.push_str(", ");
        }
        name.push_str(&forenames);
    }
    if let Some(title) = record.data.title.as_deref() {
        if !DROPPED_TITLES.contains(&title.to_ascii_lowercase().as_str()) {
            if !name.is_empty() {
                name.push_str(", ");
            }
            name.push_str(title);
        }
    }
    name
}

/// Final public state of a deleted record, attached to its deletion event.
/// Sensitive data and bookkeeping fields never leave the store.
pub fn deletion_snapshot(record: &AppointmentRecord) -> Value {
    json!({
        "appointment_id": record.appointment_id,
        "company_number": record.company_number,
        "officer_id": record.officer_id,
        "data": serde_json::to_value(summarize(record, false)).unwrap_or(Value::Null),
    })
}

/// Snapshot attached to a deletion event when the record was never held
/// locally: only the officer back-link, so downstream consumers can still
/// reconcile the officer's appointment list.
pub fn stub_deleted_snapshot(officer_id: &str) -> Value {
    json!({
        "links": {
            "officer": {
                "appointments": format!("/officers/{officer_id}/appointments"),
            },
        },
    })
}
