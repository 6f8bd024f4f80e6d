use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A locally recorded intent to apply to a listing.
///
/// `job_id` is not checked against the current listing set; the listing may
/// have been replaced by a later refetch. Only the resume's file name is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub job_id: i64,
    pub applicant_name: String,
    pub applicant_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant_phone: Option<String>,
    pub resume_file_name: String,
    pub applied_at: DateTime<Utc>,
}
