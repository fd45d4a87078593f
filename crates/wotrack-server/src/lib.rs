pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Work orders
        .route(
            "/api/work-orders/active",
            get(routes::work_orders::list_active),
        )
        .route(
            "/api/work-orders/{query}",
            get(routes::work_orders::get_work_order).put(routes::work_orders::update_work_order),
        )
        // Roster
        .route("/api/roster", get(routes::roster::get_roster))
        // Config
        .route("/api/config", get(routes::config::get_config))
        // Sessions
        .route("/api/sessions", post(routes::sessions::create_session))
        .route(
            "/api/sessions/{id}",
            delete(routes::sessions::end_session),
        )
        .route(
            "/api/sessions/{id}/{key}",
            get(routes::sessions::get_value)
                .put(routes::sessions::put_value)
                .delete(routes::sessions::clear_value),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the API server on a pre-bound listener.
///
/// The caller binds the `TcpListener` so it can read the actual port before
/// starting (useful when `port = 0` and the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("wotrack API listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/work-orders/active");
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "could not open browser");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
