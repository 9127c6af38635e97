//! HTTP surface (Axum)
//!
//! Every `/api/v1` route sits behind the API key middleware.

mod error;
mod handlers;

use crate::config::schema::ServerConfig;
use crate::error::{PoyaError, PoyaResult};
use crate::service::HolidayService;
use axum::extract::{Request, State};
use axum::http::HeaderName;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared request state
#[derive(Clone)]
pub struct AppState {
    service: Arc<HolidayService>,
    api_key_header: HeaderName,
}

/// Build the application router
pub fn router(service: Arc<HolidayService>, api_key_header: &str) -> PoyaResult<Router> {
    let api_key_header = HeaderName::from_bytes(api_key_header.as_bytes()).map_err(|e| {
        PoyaError::User(format!("Invalid API key header '{}': {}", api_key_header, e))
    })?;
    let state = AppState {
        service,
        api_key_header,
    };

    Ok(Router::new()
        .nest("/api/v1", api_v1_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn api_v1_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/status", get(handlers::status))
        .route("/version", get(handlers::version))
        .route("/coverage", get(handlers::coverage))
        .route("/check_holiday", get(handlers::check_holiday))
        .route("/holiday_info", get(handlers::holiday_info))
        .route("/holidays", get(handlers::holidays))
        .route_layer(middleware::from_fn_with_state(state, require_api_key))
}

async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> PoyaResult<Response> {
    let credential = request
        .headers()
        .get(&state.api_key_header)
        .and_then(|value| value.to_str().ok());
    state.service.auth().validate(credential).await?;
    Ok(next.run(request).await)
}

/// Bind and serve until Ctrl-C
pub async fn serve(service: Arc<HolidayService>, config: &ServerConfig) -> PoyaResult<()> {
    let app = router(service, &config.api_key_header)?;
    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .map_err(|e| PoyaError::io(format!("binding {}", config.bind), e))?;

    info!("Listening on http://{}", config.bind);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PoyaError::io("serving HTTP", e))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
