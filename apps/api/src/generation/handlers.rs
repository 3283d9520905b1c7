//! Axum route handlers for the Generation API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::generation::cleanup::{clean_cover_letter, clean_resume};
use crate::generation::prompts::{cover_letter_prompt, resume_prompt};
use crate::generation::requests::{CoverLetterRequest, ResumeRequest};
use crate::state::AppState;

/// Success envelope; failures render through `AppError` as `{success: false, error}`.
#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub success: bool,
    pub result: String,
}

impl GenerationResponse {
    fn ok(result: String) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

/// POST /api/generate/coverletter
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    payload: Result<Json<CoverLetterRequest>, JsonRejection>,
) -> Result<Json<GenerationResponse>, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let prompt = cover_letter_prompt(&request);
    let raw = state
        .generator
        .generate(&prompt)
        .await
        .map_err(|e| AppError::generation("cover letter", e))?;

    info!(
        "Generated cover letter for {} at {}",
        request.job_title.trim(),
        request.company_name.trim()
    );

    Ok(Json(GenerationResponse::ok(clean_cover_letter(&raw))))
}

/// POST /api/generate/resume
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    payload: Result<Json<ResumeRequest>, JsonRejection>,
) -> Result<Json<GenerationResponse>, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let prompt = resume_prompt(&request);
    let raw = state
        .generator
        .generate(&prompt)
        .await
        .map_err(|e| AppError::generation("resume", e))?;

    info!(
        "Generated resume ({} experiences, {} projects)",
        request.experiences.len(),
        request.projects.len()
    );

    Ok(Json(GenerationResponse::ok(clean_resume(&raw))))
}
