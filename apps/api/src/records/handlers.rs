use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Record;
use crate::state::{AppState, RepositoryFor};
use crate::store::Repository;

/// Body of a save: the record's fields, plus the id when updating.
#[derive(Debug, Deserialize)]
pub struct SaveRequest<F> {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub fields: F,
}

/// GET /api/{kind}/:owner_id
pub async fn handle_list<R>(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<Vec<R>>, AppError>
where
    R: Record + Serialize,
    AppState: RepositoryFor<R>,
{
    let records = repository::<R>(&state).list_by_owner(&owner_id).await?;
    Ok(Json(records))
}

/// GET /api/{kind}/single/:id
pub async fn handle_get<R>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<R>, AppError>
where
    R: Record + Serialize,
    AppState: RepositoryFor<R>,
{
    let id = parse_id::<R>(&id)?;
    let record = repository::<R>(&state)
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(R::KIND))?;
    Ok(Json(record))
}

/// POST /api/{kind}
///
/// Creates a record, or fully replaces an existing one when the body carries an `id`.
pub async fn handle_save<R>(
    State(state): State<AppState>,
    payload: Result<Json<SaveRequest<R::Fields>>, JsonRejection>,
) -> Result<Json<R>, AppError>
where
    R: Record + Serialize,
    R::Fields: DeserializeOwned,
    AppState: RepositoryFor<R>,
{
    let Json(SaveRequest { id, fields }) = payload?;

    if R::owner_of(&fields).trim().is_empty() {
        return Err(AppError::Validation("ownerId is required".to_string()));
    }

    let record = repository::<R>(&state)
        .save(id, fields)
        .await?
        .ok_or_else(|| AppError::not_found(R::KIND))?;

    info!(
        "{} {} {} for owner {}",
        R::KIND,
        record.id(),
        if id.is_some() { "updated" } else { "created" },
        record.owner_id()
    );

    Ok(Json(record))
}

/// DELETE /api/{kind}/:id
pub async fn handle_delete<R>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError>
where
    R: Record,
    AppState: RepositoryFor<R>,
{
    let id = parse_id::<R>(&id)?;
    if !repository::<R>(&state).delete(id).await? {
        return Err(AppError::not_found(R::KIND));
    }

    info!("{} {} deleted", R::KIND, id);
    Ok(Json(json!({ "message": format!("{} deleted successfully", R::KIND) })))
}

fn repository<R: Record>(state: &AppState) -> &dyn Repository<R>
where
    AppState: RepositoryFor<R>,
{
    <AppState as RepositoryFor<R>>::repository(state)
}

/// A malformed id can never name a record, so it reads as not found.
fn parse_id<R: Record>(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(R::KIND))
}
