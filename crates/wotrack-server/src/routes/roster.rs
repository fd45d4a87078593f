use axum::extract::State;
use axum::Json;
use wotrack_core::desk::Desk;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/roster — assignee options (roster names plus the fallback list).
pub async fn get_roster(State(app): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let root = app.root.clone();
    let options = tokio::task::spawn_blocking(move || {
        Desk::open(&root).map(|desk| desk.assignee_options())
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(options))
}
