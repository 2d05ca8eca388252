use crate::model::company_status::CompanyStatus;
use crate::model::delta_at::DeltaAt;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// Postal address shared by service, residential, and principal-office
/// variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premises: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub care_of: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po_box: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Corporate officer identification block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_authority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_form: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_registered: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormerName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forenames: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
}

/// Back-link to the officer's cross-company appointments collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficerLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointments: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub officer: Option<OfficerLinks>,
}

/// Full date of birth. Only ever persisted inside the sensitive block;
/// disclosure redaction happens at summary-mapping time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOfBirth {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    pub month: u32,
    pub year: i32,
}

/// Public officer payload of an appointment record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfficerData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_forenames: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honours: Option<String>,
    /// Corporate officers carry a company name instead of person name parts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub officer_role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointed_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointed_before: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resigned_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pre_1992_appointment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_of_residence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_address: Option<Address>,
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
}

/// Sensitive sub-block kept apart from the public payload. Never serialized
/// into public views except through the redaction rules in the summary
/// mapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensitiveData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<DateOfBirth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usual_residential_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residential_address_same_as_service_address: Option<bool>,
}

/// Canonical persisted appointment record, one per appointment id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub appointment_id: String,
    pub company_number: String,
    pub officer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_officer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,
    pub data: OfficerData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitive_data: Option<SensitiveData>,
    pub delta_at: DeltaAt,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    /// Denormalized from the company profile; maintained by the enrichment
    /// stage and the patch path, never by delta ingestion itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_status: Option<CompanyStatus>,
    /// Externally supplied sort key encoding role-class priority and
    /// active/resigned state. Used purely for ordering.
    pub officer_role_sort_order: i32,
}

impl AppointmentRecord {
    /// Recomputes the etag from the record identity and bookkeeping fields.
    /// Called after every accepted write so concurrent readers can detect
    /// that the resource moved underneath them.
    pub fn refresh_etag(&mut self) {
        let mut hasher = Sha256::new();
        hasher.update(self.company_number.as_bytes());
        hasher.update(self.appointment_id.as_bytes());
        hasher.update(self.delta_at.to_string().as_bytes());
        if let Some(updated) = self.updated {
            hasher.update(updated.to_rfc3339().as_bytes());
        }
        let digest = hasher.finalize();
        let mut etag = String::with_capacity(digest.len() * 2);
        for byte in digest {
            let _ = write!(etag, "{byte:02x}");
        }
        self.etag = Some(etag);
    }

    /// Sort key for the surname dimension: corporate officers sort by their
    /// company name where person name parts are absent.
    pub fn surname_sort_key(&self) -> &str {
        self.data
            .company_name
            .as_deref()
            .or(self.data.surname.as_deref())
            .unwrap_or_default()
    }

    /// Appointment date used for ordering; `appointed_before` stands in for
    /// pre-1992 appointments without a precise appointment date.
    pub fn appointment_date_sort_key(&self) -> Option<NaiveDate> {
        self.data.appointed_on.or(self.data.appointed_before)
    }

    /// True when the officer has not resigned.
    pub fn is_active(&self) -> bool {
        self.data.resigned_on.is_none()
    }
}
