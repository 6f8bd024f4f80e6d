use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::Application;

/// Largest accepted resume upload.
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const PHONE_MIN: u64 = 1_000_000_000;
const PHONE_MAX: u64 = 9_999_999_999;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Metadata of an uploaded resume. The file body itself is never stored.
#[derive(Debug, Clone, Default)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

/// Raw application form as submitted.
#[derive(Debug, Clone, Default)]
pub struct ApplicationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub resume: Option<ResumeUpload>,
}

/// Validates the application form and builds the `Application` to record.
///
/// All failures are collected, not just the first. Rules:
/// - name: required
/// - email: required, well-formed
/// - phone: optional; when given, numeric and 10 digits (1000000000..=9999999999)
/// - resume: required, `application/pdf`, at most 5 MB
pub fn validate_application(
    job_id: i64,
    form: &ApplicationForm,
) -> Result<Application, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = form.name.trim();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }

    let email = form.email.trim();
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !EMAIL_RE.is_match(email) {
        errors.push(FieldError::new("email", "Invalid email format"));
    }

    let phone = form.phone.trim();
    if !phone.is_empty() {
        if let Some(error) = check_phone(phone) {
            errors.push(error);
        }
    }

    match &form.resume {
        None => errors.push(FieldError::new("resume", "Resume is required")),
        Some(resume) if resume.file_name.is_empty() => {
            errors.push(FieldError::new("resume", "Resume is required"))
        }
        Some(resume) => {
            if resume.content_type != PDF_CONTENT_TYPE {
                errors.push(FieldError::new("resume", "PDF only"));
            }
            if resume.size > MAX_RESUME_BYTES {
                errors.push(FieldError::new("resume", "File size too large (max 5MB)"));
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Application {
        job_id,
        applicant_name: name.to_string(),
        applicant_email: email.to_string(),
        applicant_phone: (!phone.is_empty()).then(|| phone.to_string()),
        resume_file_name: form
            .resume
            .as_ref()
            .map(|r| r.file_name.clone())
            .unwrap_or_default(),
        applied_at: Utc::now(),
    })
}

fn check_phone(phone: &str) -> Option<FieldError> {
    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return Some(FieldError::new("phone", "Phone must be a number"));
    }
    // All digits: anything too long to parse is also too long to be a phone number.
    match phone.parse::<u64>() {
        Ok(n) if n > PHONE_MAX => Some(FieldError::new("phone", "Phone number too long")),
        Ok(n) if n < PHONE_MIN => Some(FieldError::new("phone", "Phone number too short")),
        Ok(_) => None,
        Err(_) => Some(FieldError::new("phone", "Phone number too long")),
    }
}
