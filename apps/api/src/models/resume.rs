use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Record;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    #[serde(deserialize_with = "super::null_as_default")]
    pub job_title: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub duration: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    #[serde(deserialize_with = "super::null_as_default")]
    pub degree: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub institution: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub year: String,
}

/// Everything a client submits when saving a resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeFields {
    #[serde(alias = "userId", deserialize_with = "super::null_as_default")]
    pub owner_id: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub full_name: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub experiences: Vec<ExperienceEntry>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub education: Vec<EducationEntry>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub skills: Vec<String>,
    /// Last generated resume text, cached so the client can re-open a preview.
    pub generated_resume: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: ResumeFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Resume {
    type Fields = ResumeFields;

    const KIND: &'static str = "Resume";

    fn assemble(
        id: Uuid,
        fields: ResumeFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Resume {
            id,
            fields,
            created_at,
            updated_at,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn fields(&self) -> &ResumeFields {
        &self.fields
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn owner_of(fields: &ResumeFields) -> &str {
        &fields.owner_id
    }
}
