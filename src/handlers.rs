use crate::{
    errors::AppError,
    models::{CreatePostRequest, EditImageRequest, GenerateImageRequest, GenerateImageResponse, MessageResponse},
    services,
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing;

/// Handler for GET /
pub async fn root() -> impl IntoResponse {
    Json(MessageResponse { message: "Hello from DALL.E!" })
}

/// Handler for POST /api/v1/dalle
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    tracing::debug!(prompt_len = request.prompt.len(), "Generating image via handler");

    let photo = services::generate_image(state.generator.as_ref(), &request.prompt).await?;
    Ok(Json(GenerateImageResponse { photo }))
}

/// Handler for POST /api/v1/image-edit/edit
pub async fn edit_image(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EditImageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    tracing::debug!(n = ?request.n, size = ?request.size, "Editing image via handler");

    let body = services::edit_image(state.editor.as_ref(), request).await?;
    Ok(Json(body))
}

/// Handler for POST /api/v1/post
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let post = services::publish_post(state.post_repo.as_ref(), request).await?;
    Ok(Json(post))
}

/// Handler for GET /api/v1/post
pub async fn list_posts(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    tracing::debug!("Listing all posts via handler");
    let posts = services::list_posts(state.post_repo.as_ref()).await?;
    tracing::info!("Handler successfully retrieved {} posts", posts.len());
    Ok(Json(posts))
}

/// Fallback for paths with no route.
pub async fn not_found() -> AppError {
    AppError::RouteNotFound
}

/// Fallback for known paths called with the wrong method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
