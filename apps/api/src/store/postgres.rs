use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{Repository, StoreError};
use crate::models::{
    CoverLetter, CoverLetterFields, EducationEntry, ExperienceEntry, Resume, ResumeFields,
};

/// PostgreSQL-backed repositories. Cheap to clone; shares the pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Row types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, FromRow)]
struct ResumeRow {
    id: Uuid,
    owner_id: String,
    full_name: String,
    email: String,
    phone: String,
    address: String,
    summary: String,
    experiences: Json<Vec<ExperienceEntry>>,
    education: Json<Vec<EducationEntry>>,
    skills: Vec<String>,
    generated_resume: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for Resume {
    fn from(row: ResumeRow) -> Self {
        Resume {
            id: row.id,
            fields: ResumeFields {
                owner_id: row.owner_id,
                full_name: row.full_name,
                email: row.email,
                phone: row.phone,
                address: row.address,
                summary: row.summary,
                experiences: row.experiences.0,
                education: row.education.0,
                skills: row.skills,
                generated_resume: row.generated_resume,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CoverLetterRow {
    id: Uuid,
    owner_id: String,
    applicant_name: String,
    applicant_email: String,
    applicant_phone: String,
    applicant_address: String,
    hiring_manager: String,
    company_name: String,
    job_title: String,
    job_source: String,
    skills: String,
    achievements: String,
    generated_letter: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CoverLetterRow> for CoverLetter {
    fn from(row: CoverLetterRow) -> Self {
        CoverLetter {
            id: row.id,
            fields: CoverLetterFields {
                owner_id: row.owner_id,
                applicant_name: row.applicant_name,
                applicant_email: row.applicant_email,
                applicant_phone: row.applicant_phone,
                applicant_address: row.applicant_address,
                hiring_manager: row.hiring_manager,
                company_name: row.company_name,
                job_title: row.job_title,
                job_source: row.job_source,
                skills: row.skills,
                achievements: row.achievements,
                generated_letter: row.generated_letter,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resumes
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl Repository<Resume> for PgStore {
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Resume>, StoreError> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE owner_id = $1 ORDER BY created_at ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Resume::from).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Resume>, StoreError> {
        let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Resume::from))
    }

    async fn save(
        &self,
        id: Option<Uuid>,
        fields: ResumeFields,
    ) -> Result<Option<Resume>, StoreError> {
        // Both statements bind the same ordered parameter list; $1 is the id.
        let sql = match id {
            Some(_) => {
                r#"
                UPDATE resumes SET
                    owner_id = $2, full_name = $3, email = $4, phone = $5, address = $6,
                    summary = $7, experiences = $8, education = $9, skills = $10,
                    generated_resume = $11, updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#
            }
            None => {
                r#"
                INSERT INTO resumes
                    (id, owner_id, full_name, email, phone, address, summary,
                     experiences, education, skills, generated_resume)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING *
                "#
            }
        };

        let row = sqlx::query_as::<_, ResumeRow>(sql)
            .bind(id.unwrap_or_else(Uuid::new_v4))
            .bind(fields.owner_id)
            .bind(fields.full_name)
            .bind(fields.email)
            .bind(fields.phone)
            .bind(fields.address)
            .bind(fields.summary)
            .bind(Json(fields.experiences))
            .bind(Json(fields.education))
            .bind(fields.skills)
            .bind(fields.generated_resume)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Resume::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cover letters
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl Repository<CoverLetter> for PgStore {
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<CoverLetter>, StoreError> {
        let rows = sqlx::query_as::<_, CoverLetterRow>(
            "SELECT * FROM cover_letters WHERE owner_id = $1 ORDER BY created_at ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CoverLetter::from).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<CoverLetter>, StoreError> {
        let row = sqlx::query_as::<_, CoverLetterRow>("SELECT * FROM cover_letters WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(CoverLetter::from))
    }

    async fn save(
        &self,
        id: Option<Uuid>,
        fields: CoverLetterFields,
    ) -> Result<Option<CoverLetter>, StoreError> {
        let sql = match id {
            Some(_) => {
                r#"
                UPDATE cover_letters SET
                    owner_id = $2, applicant_name = $3, applicant_email = $4,
                    applicant_phone = $5, applicant_address = $6, hiring_manager = $7,
                    company_name = $8, job_title = $9, job_source = $10, skills = $11,
                    achievements = $12, generated_letter = $13, updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#
            }
            None => {
                r#"
                INSERT INTO cover_letters
                    (id, owner_id, applicant_name, applicant_email, applicant_phone,
                     applicant_address, hiring_manager, company_name, job_title,
                     job_source, skills, achievements, generated_letter)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                RETURNING *
                "#
            }
        };

        let row = sqlx::query_as::<_, CoverLetterRow>(sql)
            .bind(id.unwrap_or_else(Uuid::new_v4))
            .bind(fields.owner_id)
            .bind(fields.applicant_name)
            .bind(fields.applicant_email)
            .bind(fields.applicant_phone)
            .bind(fields.applicant_address)
            .bind(fields.hiring_manager)
            .bind(fields.company_name)
            .bind(fields.job_title)
            .bind(fields.job_source)
            .bind(fields.skills)
            .bind(fields.achievements)
            .bind(fields.generated_letter)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CoverLetter::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM cover_letters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
