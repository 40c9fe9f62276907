#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use imagegen_feed::{
    config::Config,
    domain::{ImageEditor, ImageGenerator, PostRepository},
    errors::{RepoError, UpstreamError},
    models::{EditPayload, GenerationBody, NewPost, Post},
    routes::create_router,
    AppState,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

pub const TEST_ORIGIN: &str = "https://feed.example.com";

pub fn test_config(extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("OPENAI_API_KEY".to_string(), "sk-test".to_string()),
        ("ALLOWED_ORIGIN".to_string(), TEST_ORIGIN.to_string()),
    ]);
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).expect("test config")
}

/// What the fake upstream answers with.
#[derive(Clone)]
pub enum Reply<T> {
    Ok(T),
    Status(u16, Option<String>),
}

impl<T: Clone> Reply<T> {
    fn produce(&self) -> Result<T, UpstreamError> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Status(status, message) => Err(UpstreamError::Status {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

pub struct FakeGenerator {
    reply: Reply<GenerationBody>,
    delay: Option<Duration>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn new(reply: Reply<GenerationBody>) -> Self {
        Self { reply, delay: None, prompts: Mutex::new(Vec::new()) }
    }

    /// Answers only after `delay`, like a stalled upstream.
    pub fn slow(reply: Reply<GenerationBody>, delay: Duration) -> Self {
        Self { reply, delay: Some(delay), prompts: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerationBody, UpstreamError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.produce()
    }
}

pub struct FakeEditor {
    reply: Reply<serde_json::Value>,
    pub payloads: Mutex<Vec<EditPayload>>,
}

impl FakeEditor {
    pub fn new(reply: Reply<serde_json::Value>) -> Self {
        Self { reply, payloads: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.payloads.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageEditor for FakeEditor {
    async fn edit(&self, payload: EditPayload) -> Result<serde_json::Value, UpstreamError> {
        self.payloads.lock().unwrap().push(payload);
        self.reply.produce()
    }
}

#[derive(Default)]
pub struct FakeRepo {
    pub posts: Mutex<Vec<Post>>,
    pub fail: bool,
    writes: AtomicUsize,
}

impl FakeRepo {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostRepository for FakeRepo {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RepoError::BackendError(anyhow::anyhow!("store unavailable")));
        }
        let post = Post {
            id: Uuid::new_v4(),
            name: post.name,
            prompt: post.prompt,
            photo: post.photo,
            created_at: Utc::now(),
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        if self.fail {
            return Err(RepoError::BackendError(anyhow::anyhow!("store unavailable")));
        }
        Ok(self.posts.lock().unwrap().clone())
    }
}

pub fn app_with(
    config: &Config,
    post_repo: Arc<dyn PostRepository>,
    generator: Arc<dyn ImageGenerator>,
    editor: Arc<dyn ImageEditor>,
) -> Router {
    let state = Arc::new(AppState { post_repo, generator, editor });
    create_router(state, config).expect("router")
}

/// Serves `router` on an ephemeral local port.
pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}
