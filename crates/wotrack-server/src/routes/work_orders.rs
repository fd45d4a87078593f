use axum::extract::{Path, State};
use axum::Json;
use wotrack_core::active::ActiveRow;
use wotrack_core::desk::{intent_from_form, Desk, SavedEdit};
use wotrack_core::WotrackError;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/work-orders/active — pending, in-progress and unassigned orders.
pub async fn list_active(State(app): State<AppState>) -> Result<Json<Vec<ActiveRow>>, AppError> {
    let root = app.root.clone();
    let rows = tokio::task::spawn_blocking(move || Desk::open(&root)?.active())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(rows))
}

/// GET /api/work-orders/:query — the edit form for one work order.
pub async fn get_work_order(
    State(app): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let q = query.clone();
    let form = tokio::task::spawn_blocking(move || Desk::open(&root)?.lookup(&q))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    match form {
        Some(form) => Ok(Json(serde_json::json!({
            "query": query,
            "form": form,
        }))),
        None => Err(AppError::not_found(format!(
            "work order '{}' not found",
            query.trim()
        ))),
    }
}

#[derive(serde::Deserialize)]
pub struct UpdateBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

/// PUT /api/work-orders/:query — save a new status and/or assignee.
///
/// Omitted fields keep the form's default selection.
pub async fn update_work_order(
    State(app): State<AppState>,
    Path(query): Path<String>,
    Json(body): Json<UpdateBody>,
) -> Result<Json<SavedEdit>, AppError> {
    let root = app.root.clone();
    let saved = tokio::task::spawn_blocking(move || {
        let desk = Desk::open(&root)?;
        let form = desk
            .lookup(&query)?
            .ok_or_else(|| WotrackError::WorkOrderNotFound(query.trim().to_string()))?;
        let intent = intent_from_form(&form, body.status, body.assigned_to);
        desk.save(&query, &intent)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(saved))
}
