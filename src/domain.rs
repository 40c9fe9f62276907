use crate::errors::{RepoError, UpstreamError};
use crate::models::{EditPayload, GenerationBody, NewPost, Post};
use async_trait::async_trait;

/// Trait defining operations for storing and listing feed posts.
#[async_trait]
pub trait PostRepository: Send + Sync + 'static { // Send+Sync+'static required for Arc<dyn>
    /// Inserts a new post. The store assigns the identifier and timestamp.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Lists every post in insertion order.
    async fn list_all(&self) -> Result<Vec<Post>, RepoError>;
}

/// Text-to-image API.
#[async_trait]
pub trait ImageGenerator: Send + Sync + 'static {
    /// Sends one prompt upstream and classifies the successful body.
    async fn generate(&self, prompt: &str) -> Result<GenerationBody, UpstreamError>;
}

/// Mask-based inpainting API.
#[async_trait]
pub trait ImageEditor: Send + Sync + 'static {
    /// Returns the upstream JSON body untouched.
    async fn edit(&self, payload: EditPayload) -> Result<serde_json::Value, UpstreamError>;
}
