use axum::extract::{Path, State};
use axum::Json;
use std::sync::MutexGuard;

use crate::error::AppError;
use crate::state::{AppState, Sessions};

fn lock(app: &AppState) -> Result<MutexGuard<'_, Sessions>, AppError> {
    app.sessions
        .lock()
        .map_err(|_| AppError(anyhow::anyhow!("session map lock poisoned")))
}

fn unknown_session(id: &str) -> AppError {
    AppError::not_found(format!("session '{id}' not found"))
}

/// POST /api/sessions — start a session and return its id.
pub async fn create_session(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = uuid::Uuid::new_v4().to_string();
    lock(&app)?.insert(id.clone());
    Ok(Json(serde_json::json!({ "id": id })))
}

/// DELETE /api/sessions/:id — end a session and drop its values.
pub async fn end_session(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !lock(&app)?.remove(&id) {
        return Err(unknown_session(&id));
    }
    Ok(Json(serde_json::json!({ "id": id, "removed": true })))
}

/// GET /api/sessions/:id/:key
pub async fn get_value(
    State(app): State<AppState>,
    Path((id, key)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut sessions = lock(&app)?;
    let session = sessions.get_mut(&id).ok_or_else(|| unknown_session(&id))?;
    let value = session.get(&key).map(str::to_string);
    Ok(Json(serde_json::json!({ "key": key, "value": value })))
}

#[derive(serde::Deserialize)]
pub struct PutValueBody {
    pub value: String,
}

/// PUT /api/sessions/:id/:key
pub async fn put_value(
    State(app): State<AppState>,
    Path((id, key)): Path<(String, String)>,
    Json(body): Json<PutValueBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut sessions = lock(&app)?;
    let session = sessions.get_mut(&id).ok_or_else(|| unknown_session(&id))?;
    session.set(key.clone(), body.value.clone());
    Ok(Json(serde_json::json!({ "key": key, "value": body.value })))
}

/// DELETE /api/sessions/:id/:key — reset one value (the "clear search" button).
pub async fn clear_value(
    State(app): State<AppState>,
    Path((id, key)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut sessions = lock(&app)?;
    let session = sessions.get_mut(&id).ok_or_else(|| unknown_session(&id))?;
    let previous = session.clear(&key);
    Ok(Json(serde_json::json!({ "key": key, "previous": previous })))
}
