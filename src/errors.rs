use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate image.";
pub const NO_IMAGE_MESSAGE: &str = "No image generated. Please try a different prompt.";
pub const EDIT_FAILED_MESSAGE: &str = "Failed to edit image.";
pub const EDIT_FIELDS_REQUIRED_MESSAGE: &str = "Image, mask, and prompt are required.";
pub const PUBLISH_FAILED_MESSAGE: &str = "Failed to share post.";
pub const FEED_FAILED_MESSAGE: &str = "Failed to load posts.";
pub const TIMEOUT_MESSAGE: &str = "The request took too long to complete.";
pub const NOT_FOUND_MESSAGE: &str = "Not found.";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed.";

// --- Domain/Infrastructure Errors ---

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Database backend error: {0}")]
    BackendError(#[from] anyhow::Error),

    #[error("Stored data could not be read: {0}")]
    DataCorruption(String),
}

/// Failure talking to one of the image APIs.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("upstream responded with {status}: {}", .message.as_deref().unwrap_or("<no error message>"))]
    Status { status: u16, message: Option<String> },

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream body was not valid JSON: {0}")]
    InvalidBody(String),
}

impl UpstreamError {
    /// Error text supplied by the upstream itself, if any.
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            UpstreamError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Input rejected before any outbound call or store write.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please provide a valid prompt.")]
    EmptyPrompt,
    #[error("Please generate an image before sharing.")]
    MissingPhoto,
    #[error("{}", EDIT_FIELDS_REQUIRED_MESSAGE)]
    MissingEditFields,
    #[error("The {0} is not valid base64 image data.")]
    InvalidBase64(&'static str),
    #[error("Unsupported size '{0}'. Use 256x256, 512x512 or 1024x1024.")]
    UnsupportedSize(String),
    #[error("n must be between 1 and {max}, got {got}.")]
    InvalidCount { got: u32, max: u32 },
}

// --- Web Layer Error ---

#[derive(Error, Debug)]
pub enum AppError {
    // Input validation / request parsing errors
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Malformed request body: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("No route for this path")]
    RouteNotFound,
    #[error("Method not allowed for this path")]
    MethodNotAllowed,

    // Upstream image API errors
    #[error("Image generation failed")]
    GenerationFailed(#[source] UpstreamError),
    #[error("Upstream returned no usable image")]
    NoImageProduced,
    #[error("Image edit failed")]
    EditFailed(#[source] UpstreamError),

    #[error("Request exceeded its {0:?} deadline")]
    RequestTimeout(std::time::Duration),

    // Store errors
    #[error("Could not save post")]
    PublishFailed(#[source] RepoError),
    #[error("Could not list posts")]
    FeedUnavailable(#[source] RepoError),

    // Configuration / Startup errors
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Initialization error: {0}")]
    InitError(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl From<crate::config::ConfigError> for AppError {
    fn from(err: crate::config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl AppError {
    /// Status code and client-facing message for this error.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            // 4xx Client Errors
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::JsonRejection(rejection) => (rejection.status(), rejection.body_text()),
            AppError::RouteNotFound => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.to_string()),
            AppError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE.to_string()),

            // 5xx Server Errors
            AppError::GenerationFailed(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                e.upstream_message().unwrap_or(GENERATION_FAILED_MESSAGE).to_string(),
            ),
            AppError::NoImageProduced => (StatusCode::BAD_GATEWAY, NO_IMAGE_MESSAGE.to_string()),
            AppError::EditFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, EDIT_FAILED_MESSAGE.to_string()),
            AppError::RequestTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, TIMEOUT_MESSAGE.to_string()),
            AppError::PublishFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, PUBLISH_FAILED_MESSAGE.to_string()),
            AppError::FeedUnavailable(_) => (StatusCode::INTERNAL_SERVER_ERROR, FEED_FAILED_MESSAGE.to_string()),
            AppError::ConfigError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server configuration error".to_string()),
            AppError::InitError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server initialization error".to_string()),
            AppError::InternalServerError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred".to_string(),
            ),
        }
    }
}

// --- Axum Response Implementation ---

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();

        if status.is_server_error() {
            let source = std::error::Error::source(&self).map(|s| s.to_string());
            tracing::error!(error.message = %error_message, error.detail = %self, error.source = ?source, %status, "Responding with error");
        } else {
            tracing::warn!(error.message = %error_message, %status, "Rejecting request");
        }

        let body = Json(serde_json::json!({ "error": error_message }));
        (status, body).into_response()
    }
}
