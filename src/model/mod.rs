//! Canonical record model: appointment documents, role classes, company
//! statuses, and the logical delta version clock.

pub mod appointment;
pub mod company_status;
pub mod delta_at;
pub mod roles;

pub use appointment::{
    Address, AppointmentRecord, ContactDetails, DateOfBirth, FormerName, Identification,
    ItemLinks, OfficerData, OfficerLinks, SensitiveData,
};
pub use company_status::CompanyStatus;
pub use delta_at::{DeltaAt, DeltaAtError};
pub use roles::{is_director, is_llp_member, is_secretary, RegisterType};
