//! Wire types for the Happay add-user endpoint

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Salutation sent alongside the gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Title {
    #[serde(rename = "Mr.")]
    Mr,
    #[serde(rename = "Ms.")]
    Ms,
}

impl Title {
    /// "Mr." when the gender is "male" in any letter case, "Ms." otherwise
    pub fn for_gender(gender: &str) -> Self {
        if gender.eq_ignore_ascii_case("male") {
            Title::Mr
        } else {
            Title::Ms
        }
    }
}

/// Organisation fields nested under `extra_fields`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtraFields {
    pub cost_centre: String,
    pub cost_category: String,
    pub designation: String,
    pub department: String,
}

/// Body of one add-user call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionRequest {
    #[serde(rename = "requestId")]
    pub request_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "emailId")]
    pub email_id: String,
    #[serde(rename = "mobileNo")]
    pub mobile_no: String,
    pub mobile_extension: String,
    pub dob: String,
    pub title: Title,
    pub gender: String,
    pub extra_fields: ExtraFields,
}

/// Fresh idempotency token for a single call
pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Fresh client-side user id, `usr_` followed by 32 hex digits
pub fn new_user_id() -> String {
    format!("usr_{}", Uuid::new_v4().simple())
}

/// Provider-assigned id from a successful response body
///
/// Falls back to "Unknown" when the body has no `userId` key. A `null` or
/// empty id is no id at all and yields `None`.
pub fn assigned_user_id(body: &Value) -> Option<String> {
    match body.get("userId") {
        None => Some("Unknown".to_string()),
        Some(Value::Null) => None,
        Some(Value::String(id)) if id.is_empty() => None,
        Some(Value::String(id)) => Some(id.clone()),
        Some(other) => Some(other.to_string()),
    }
}
