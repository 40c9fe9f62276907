//! Prompt-to-image service: generates images through an external API,
//! forwards inpainting edits, and publishes finished images to a shared feed.

pub mod aws_clients;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod providers;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod startup;
pub mod validation;

use crate::domain::{ImageEditor, ImageGenerator, PostRepository};
use std::sync::Arc;

/// AppState holds shared resources for the web server.
#[derive(Clone)]
pub struct AppState {
    pub post_repo: Arc<dyn PostRepository>,
    pub generator: Arc<dyn ImageGenerator>,
    pub editor: Arc<dyn ImageEditor>,
}
