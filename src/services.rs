use crate::{
    domain::{ImageEditor, ImageGenerator, PostRepository},
    errors::AppError,
    models::{CreatePostRequest, EditImageRequest, ImageData, Post},
    normalize::normalize,
    validation::{validate_edit, validate_post, validate_prompt},
};
use tracing;

/// Validates the prompt, calls the generator and reduces the answer to one image.
pub async fn generate_image(generator: &dyn ImageGenerator, prompt: &str) -> Result<ImageData, AppError> {
    validate_prompt(prompt)?;

    let body = generator.generate(prompt).await.map_err(|e| {
        tracing::warn!(error = %e, "Image generation upstream call failed");
        AppError::GenerationFailed(e)
    })?;

    normalize(body).ok_or(AppError::NoImageProduced)
}

/// Validates and decodes the edit request, then forwards the upstream body as-is.
pub async fn edit_image(editor: &dyn ImageEditor, request: EditImageRequest) -> Result<serde_json::Value, AppError> {
    let payload = validate_edit(request)?;

    editor.edit(payload).await.map_err(|e| {
        tracing::error!(error = %e, "Error in image edit upstream call");
        AppError::EditFailed(e)
    })
}

/// Stores a finished post. `name` is not checked.
pub async fn publish_post(repo: &dyn PostRepository, request: CreatePostRequest) -> Result<Post, AppError> {
    let new_post = validate_post(request)?;
    let post = repo.create(new_post).await.map_err(AppError::PublishFailed)?;
    tracing::info!(post_id = %post.id, "Post published");
    Ok(post)
}

pub async fn list_posts(repo: &dyn PostRepository) -> Result<Vec<Post>, AppError> {
    repo.list_all().await.map_err(AppError::FeedUnavailable)
}
