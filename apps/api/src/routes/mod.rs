pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers::{handle_generate_cover_letter, handle_generate_resume};
use crate::models::{CoverLetter, Resume};
use crate::records::handlers::{handle_delete, handle_get, handle_list, handle_save};
use crate::state::AppState;

// `/:key` is an owner id for GET and a record id for DELETE; the two share a
// segment position, so they share one route.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation API
        .route("/api/generate/resume", post(handle_generate_resume))
        .route("/api/generate/coverletter", post(handle_generate_cover_letter))
        // Resume records
        .route("/api/resumes", post(handle_save::<Resume>))
        .route("/api/resumes/single/:id", get(handle_get::<Resume>))
        .route(
            "/api/resumes/:key",
            get(handle_list::<Resume>).delete(handle_delete::<Resume>),
        )
        // Cover letter records
        .route("/api/coverletters", post(handle_save::<CoverLetter>))
        .route("/api/coverletters/single/:id", get(handle_get::<CoverLetter>))
        .route(
            "/api/coverletters/:key",
            get(handle_list::<CoverLetter>).delete(handle_delete::<CoverLetter>),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::errors::QUOTA_MESSAGE;
    use crate::llm_client::testing::{quota_error, RecordingSleeper, ScriptedBackend};
    use crate::llm_client::{GenerationClient, LlmError};
    use crate::store::MemoryStore;

    fn app_with(
        script: Vec<Result<String, LlmError>>,
        max_retries: u32,
    ) -> (Router, Arc<ScriptedBackend>) {
        let backend = Arc::new(ScriptedBackend::new(script));
        let generator = GenerationClient::new(backend.clone(), max_retries)
            .with_sleeper(Arc::new(RecordingSleeper::default()));
        let state = AppState {
            generator,
            resumes: Arc::new(MemoryStore::<Resume>::new()),
            cover_letters: Arc::new(MemoryStore::<CoverLetter>::new()),
        };
        (build_router(state), backend)
    }

    fn app() -> Router {
        app_with(vec![], 0).0
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    // ── Generation ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_cover_letter_missing_required_fields_is_400() {
        let (app, backend) = app_with(vec![Ok("unused".to_string())], 3);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/generate/coverletter",
            Some(json!({ "applicantName": "Jane Doe" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(
            body["error"],
            "Missing required fields: companyName, jobTitle"
        );
        assert_eq!(backend.calls(), 0, "invalid requests never reach the model");
    }

    #[tokio::test]
    async fn test_malformed_json_is_400_with_envelope() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/generate/resume")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_cover_letter_generation_returns_cleaned_text() {
        let raw = "\n\nDear Hiring Manager,\nI am applying to Acme.\n\n\n\nSincerely,\n[Your Name]";
        let (app, backend) = app_with(vec![Ok(raw.to_string())], 3);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/generate/coverletter",
            Some(json!({
                "applicantName": "Jane Doe",
                "companyName": "Acme",
                "jobTitle": "Engineer"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(
            body["result"],
            "Dear Hiring Manager,\n\nI am applying to Acme.\n\nSincerely,"
        );

        let prompt = backend.last_prompt().unwrap();
        assert!(prompt.contains("Jane Doe"));
        assert!(prompt.contains("Acme"));
        assert!(prompt.contains("Engineer"));
    }

    #[tokio::test]
    async fn test_null_optional_fields_fall_back_to_defaults() {
        let (app, backend) = app_with(vec![Ok("Dear Hiring Manager,".to_string())], 0);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/generate/coverletter",
            Some(json!({
                "applicantName": "Jane Doe",
                "companyName": "Acme",
                "jobTitle": "Engineer",
                "skills": null,
                "hiringManager": null
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let prompt = backend.last_prompt().unwrap();
        assert!(prompt.contains("2-3 most relevant of:\nNot specified"));
        assert!(prompt.contains("Address to: Hiring Manager"));
    }

    #[tokio::test]
    async fn test_generation_retries_then_succeeds() {
        let (app, backend) = app_with(
            vec![Err(LlmError::EmptyResponse), Ok("JANE DOE\n- Rust".to_string())],
            3,
        );

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/generate/resume",
            Some(json!({
                "fullName": "Jane Doe",
                "email": "jane@example.com",
                "phone": "555-0100",
                "summary": "Backend engineer"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], "JANE DOE\n• Rust");
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_quota_exhaustion_maps_to_fixed_message() {
        let (app, backend) = app_with(vec![Err(quota_error()), Err(quota_error())], 1);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/generate/coverletter",
            Some(json!({
                "applicantName": "Jane Doe",
                "companyName": "Acme",
                "jobTitle": "Engineer"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], QUOTA_MESSAGE);
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_other_upstream_failure_is_500_with_generic_message() {
        let (app, _) = app_with(vec![Err(LlmError::EmptyResponse)], 0);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/generate/resume",
            Some(json!({
                "fullName": "Jane Doe",
                "email": "jane@example.com",
                "phone": "555-0100",
                "summary": "Backend engineer"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Failed to generate resume: No text in response"
        );
    }

    // ── Records ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_resume_crud_round_trip() {
        let app = app();
        let input = json!({
            "ownerId": "user_1",
            "fullName": "Jane Doe",
            "email": "jane@example.com",
            "summary": "Backend engineer",
            "experiences": [{
                "jobTitle": "Engineer",
                "company": "Acme",
                "duration": "2020-2024",
                "description": "Built billing APIs"
            }],
            "education": [{"degree": "BSc", "institution": "State", "year": "2018"}],
            "skills": ["Rust", "SQL"]
        });

        let (status, created) = send(&app, Method::POST, "/api/resumes", Some(input.clone())).await;
        assert_eq!(status, StatusCode::OK);
        let fields = [
            "ownerId",
            "fullName",
            "email",
            "summary",
            "experiences",
            "education",
            "skills",
        ];
        for field in fields {
            assert_eq!(created[field], input[field], "field {field}");
        }
        let id = created["id"].as_str().unwrap().to_string();

        let (status, fetched) =
            send(&app, Method::GET, &format!("/api/resumes/single/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, listed) = send(&app, Method::GET, "/api/resumes/user_1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, deleted) =
            send(&app, Method::DELETE, &format!("/api/resumes/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["message"], "Resume deleted successfully");

        let (status, body) =
            send(&app, Method::GET, &format!("/api/resumes/single/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Resume not found");
    }

    #[tokio::test]
    async fn test_cover_letter_save_with_id_replaces_record() {
        let app = app();
        let (_, created) = send(
            &app,
            Method::POST,
            "/api/coverletters",
            Some(json!({ "ownerId": "user_1", "companyName": "Acme" })),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, updated) = send(
            &app,
            Method::POST,
            "/api/coverletters",
            Some(json!({
                "id": id,
                "ownerId": "user_1",
                "companyName": "Globex",
                "generatedLetter": "Dear Hiring Manager,"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], created["id"]);
        assert_eq!(updated["companyName"], "Globex");
        assert_eq!(updated["generatedLetter"], "Dear Hiring Manager,");
        assert_eq!(updated["createdAt"], created["createdAt"]);

        let (_, listed) = send(&app, Method::GET, "/api/coverletters/user_1", None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_accepts_user_id_and_null_fields() {
        let app = app();
        let (status, created) = send(
            &app,
            Method::POST,
            "/api/resumes",
            Some(json!({ "userId": "user_1", "fullName": "Jane", "address": null })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["ownerId"], "user_1");
        assert_eq!(created["address"], "");

        let (_, listed) = send(&app, Method::GET, "/api/resumes/user_1", None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_without_owner_is_400() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/coverletters",
            Some(json!({ "companyName": "Acme" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ownerId is required");
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids_are_404() {
        let app = app();
        let unknown = uuid::Uuid::new_v4();

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/resumes",
            Some(json!({ "id": unknown, "ownerId": "user_1" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let uri = format!("/api/coverletters/{unknown}");
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let uri = "/api/coverletters/single/not-a-uuid";
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Cover letter not found");
    }

    #[tokio::test]
    async fn test_listing_unknown_owner_is_empty() {
        let (status, body) = send(&app(), Method::GET, "/api/resumes/nobody", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}
