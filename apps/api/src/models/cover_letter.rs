use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Record;

/// Everything a client submits when saving a cover letter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverLetterFields {
    #[serde(alias = "userId", deserialize_with = "super::null_as_default")]
    pub owner_id: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub applicant_name: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub applicant_email: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub applicant_phone: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub applicant_address: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub hiring_manager: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub company_name: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub job_title: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub job_source: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub skills: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub achievements: String,
    pub generated_letter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetter {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: CoverLetterFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for CoverLetter {
    type Fields = CoverLetterFields;

    const KIND: &'static str = "Cover letter";

    fn assemble(
        id: Uuid,
        fields: CoverLetterFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        CoverLetter {
            id,
            fields,
            created_at,
            updated_at,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn fields(&self) -> &CoverLetterFields {
        &self.fields
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn owner_of(fields: &CoverLetterFields) -> &str {
        &fields.owner_id
    }
}
