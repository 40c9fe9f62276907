use imagegen_feed::{
    aws_clients::{create_dynamodb_client, create_sdk_config},
    config::Config,
    errors::AppError,
    providers::{create_http_client, HttpImageClient},
    repositories::DynamoDbPostRepository,
    routes::create_router,
    startup::init_resources,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "imagegen_feed=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::debug!(?config, "Configuration loaded");

    // --- Document store ---
    let sdk_config = create_sdk_config(&config).await;
    let db_client = create_dynamodb_client(&sdk_config);
    init_resources(&db_client, &config.posts_table_name).await?;

    // --- Image APIs ---
    let http_client = create_http_client(config.upstream_timeout)
        .map_err(|e| AppError::InitError(format!("Failed to build HTTP client: {}", e)))?;
    let image_client = Arc::new(HttpImageClient::new(http_client, &config));

    let state = Arc::new(AppState {
        post_repo: Arc::new(DynamoDbPostRepository::new(db_client, config.posts_table_name.clone())),
        generator: image_client.clone(),
        editor: image_client,
    });

    let app = create_router(state, &config)?;

    tracing::info!("Server listening on http://{}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
