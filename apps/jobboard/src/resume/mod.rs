// Resume generator: a flat form rendered to a single PDF table.
// Rendering is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod handlers;
pub mod metrics;
pub mod pdf;

use serde::Deserialize;

use crate::errors::AppError;

pub const INCOMPLETE_FORM_MESSAGE: &str = "Please fill out all fields before generating the resume.";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResumeForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub education: String,
    pub experience: String,
    pub skills: String,
}

impl ResumeForm {
    /// Table rows in display order.
    pub fn rows(&self) -> [(&'static str, &str); 6] {
        [
            ("Name", self.name.as_str()),
            ("Email", self.email.as_str()),
            ("Phone", self.phone.as_str()),
            ("Education", self.education.as_str()),
            ("Experience", self.experience.as_str()),
            ("Skills", self.skills.as_str()),
        ]
    }

    /// Every field is required; contents are not otherwise checked.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.rows().iter().any(|(_, value)| value.trim().is_empty()) {
            return Err(AppError::Validation(INCOMPLETE_FORM_MESSAGE.to_string()));
        }
        Ok(())
    }

    /// `resume_<name>.pdf`. Anything outside ASCII letters, digits and
    /// ` -_.` becomes `_` so the name is safe in a header value.
    pub fn file_name(&self) -> String {
        let name: String = self
            .name
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("resume_{name}.pdf")
    }
}
