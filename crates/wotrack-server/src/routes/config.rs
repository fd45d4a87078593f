use axum::extract::State;
use axum::Json;
use wotrack_core::config::Config;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/config — the effective configuration.
pub async fn get_config(State(app): State<AppState>) -> Result<Json<Config>, AppError> {
    let root = app.root.clone();
    let config = tokio::task::spawn_blocking(move || Config::load(&root))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(config))
}
