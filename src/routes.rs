use crate::{
    config::Config,
    errors::AppError,
    handlers,
    AppState,
};
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
};

/// Creates the Axum router and associates routes with handlers.
pub fn create_router(state: Arc<AppState>, config: &Config) -> Result<Router, AppError> {
    let origin = HeaderValue::from_str(&config.allowed_origin)
        .map_err(|e| AppError::ConfigError(format!("Invalid ALLOWED_ORIGIN '{}': {}", config.allowed_origin, e)))?;

    let router = Router::new()
        .route("/", get(handlers::root))
        .route("/api/v1/dalle", post(handlers::generate_image))
        .route("/api/v1/post", post(handlers::create_post).get(handlers::list_posts))
        .route("/api/v1/image-edit/edit", post(handlers::edit_image))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        // Middleware Layers
        .layer(middleware::from_fn_with_state(config.request_timeout, enforce_deadline))
        .layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .with_state(state);

    Ok(router)
}

/// Answers 504 once the request outlives its deadline. The handler future is
/// dropped, which cancels any upstream call still in flight.
async fn enforce_deadline(
    State(deadline): State<Duration>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    tokio::time::timeout(deadline, next.run(request))
        .await
        .map_err(|_| AppError::RequestTimeout(deadline))
}
