//! Row to add-user payload mapping
//!
//! Defaults only apply when a column is missing from the sheet. A column that
//! is present but blank keeps its blank value, except for `Email` which is
//! derived from the name whenever it is blank or missing.

use crate::api::models::{new_request_id, new_user_id};
use crate::api::{ExtraFields, ProvisionRequest, Title};
use crate::input::Row;

pub const DEFAULT_EMAIL_DOMAIN: &str = "happay.in";

/// Recognised sheet headers (exact, case-sensitive)
pub mod columns {
    pub const FIRST_NAME: &str = "First Name";
    pub const LAST_NAME: &str = "Last Name";
    pub const EMAIL: &str = "Email";
    pub const MOBILE: &str = "Mobile";
    pub const MOBILE_EXTENSION: &str = "mobile_extension";
    pub const DATE_OF_BIRTH: &str = "Date of Birth";
    pub const GENDER: &str = "Gender";
    pub const COST_CENTRE: &str = "Cost Centre";
    pub const COST_CATEGORY: &str = "Cost Category";
    pub const DESIGNATION: &str = "Designation";
    pub const DEPARTMENT: &str = "Department";
}

/// User fields extracted from one sheet row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_no: String,
    pub mobile_extension: String,
    pub dob: String,
    pub gender: String,
    pub cost_centre: String,
    pub cost_category: String,
    pub designation: String,
    pub department: String,
}

impl UserRecord {
    pub fn from_row(row: &Row, email_domain: &str) -> Self {
        let text = |header: &str, default: &str| row.get(header).unwrap_or(default).to_string();

        let first_name = text(columns::FIRST_NAME, "Unknown");
        let last_name = text(columns::LAST_NAME, "Unknown");

        let email = match row.get(columns::EMAIL) {
            Some(email) if !email.trim().is_empty() => email.to_string(),
            _ => derive_email(&first_name, &last_name, email_domain),
        };

        Self {
            email,
            mobile_no: text(columns::MOBILE, ""),
            mobile_extension: text(columns::MOBILE_EXTENSION, "+91"),
            dob: text(columns::DATE_OF_BIRTH, ""),
            gender: text(columns::GENDER, "Male"),
            cost_centre: text(columns::COST_CENTRE, ""),
            cost_category: text(columns::COST_CATEGORY, ""),
            designation: text(columns::DESIGNATION, ""),
            department: text(columns::DEPARTMENT, ""),
            first_name,
            last_name,
        }
    }

    pub fn title(&self) -> Title {
        Title::for_gender(&self.gender)
    }
}

/// `first.last@domain`, both name parts lowercased
pub fn derive_email(first_name: &str, last_name: &str, domain: &str) -> String {
    format!(
        "{}.{}@{}",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        domain
    )
}

impl From<UserRecord> for ProvisionRequest {
    fn from(record: UserRecord) -> Self {
        let title = record.title();
        Self {
            request_id: new_request_id(),
            user_id: new_user_id(),
            first_name: record.first_name,
            last_name: record.last_name,
            email_id: record.email,
            mobile_no: record.mobile_no,
            mobile_extension: record.mobile_extension,
            dob: record.dob,
            title,
            gender: record.gender,
            extra_fields: ExtraFields {
                cost_centre: record.cost_centre,
                cost_category: record.cost_category,
                designation: record.designation,
                department: record.department,
            },
        }
    }
}

/// Maps sheet rows into add-user payloads
#[derive(Debug, Clone)]
pub struct RecordMapper {
    email_domain: String,
}

impl Default for RecordMapper {
    fn default() -> Self {
        Self::new(DEFAULT_EMAIL_DOMAIN)
    }
}

impl RecordMapper {
    pub fn new(email_domain: impl Into<String>) -> Self {
        Self {
            email_domain: email_domain.into(),
        }
    }

    /// Build a payload for one row; never fails, every call gets fresh ids
    pub fn map(&self, row: &Row) -> ProvisionRequest {
        UserRecord::from_row(row, &self.email_domain).into()
    }
}
