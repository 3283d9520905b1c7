use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{null_as_default, ExperienceEntry};

// ────────────────────────────────────────────────────────────────────────────
// Request bodies
// ────────────────────────────────────────────────────────────────────────────
//
// Every field deserializes with a default, and `null` reads as that default,
// so a missing required field is reported by `validate` as a 400, not
// rejected by the extractor.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverLetterRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub applicant_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub job_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: String,
    #[serde(deserialize_with = "null_as_default")]
    pub achievements: String,
    #[serde(deserialize_with = "null_as_default")]
    pub job_source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hiring_manager: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationDetail {
    #[serde(deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub year: String,
    #[serde(deserialize_with = "null_as_default")]
    pub gpa: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDetail {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub experiences: Vec<ExperienceEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<EducationDetail>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<ProjectDetail>,
}

impl CoverLetterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&[
            ("applicantName", &self.applicant_name),
            ("companyName", &self.company_name),
            ("jobTitle", &self.job_title),
        ])
    }
}

impl ProjectDetail {
    pub fn is_blank(&self) -> bool {
        [&self.name, &self.technologies, &self.description]
            .iter()
            .all(|value| value.trim().is_empty())
    }
}

impl ResumeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&[
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("summary", &self.summary),
        ])
    }
}

/// Fails with every blank field named, in the order given.
fn require(fields: &[(&str, &String)]) -> Result<(), AppError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cover_letter_missing_fields_are_listed() {
        let request: CoverLetterRequest =
            serde_json::from_value(json!({ "applicantName": "Jane Doe", "jobTitle": "  " }))
                .unwrap();

        match request.validate() {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "Missing required fields: companyName, jobTitle");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_cover_letter_request_validates() {
        let request = CoverLetterRequest {
            applicant_name: "Jane Doe".to_string(),
            company_name: "Acme".to_string(),
            job_title: "Engineer".to_string(),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let request: CoverLetterRequest = serde_json::from_value(json!({
            "applicantName": "Jane Doe",
            "companyName": "Acme",
            "jobTitle": "Engineer",
            "skills": null,
            "hiringManager": null
        }))
        .unwrap();

        assert!(request.skills.is_empty());
        assert!(request.hiring_manager.is_empty());
        assert!(request.validate().is_ok());

        let request: ResumeRequest =
            serde_json::from_value(json!({ "fullName": null, "skills": null })).unwrap();
        assert!(request.full_name.is_empty());
        assert!(request.skills.is_empty());
    }

    #[test]
    fn test_empty_resume_request_reports_all_required_fields() {
        let request: ResumeRequest = serde_json::from_value(json!({})).unwrap();
        match request.validate() {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "Missing required fields: fullName, email, phone, summary");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
