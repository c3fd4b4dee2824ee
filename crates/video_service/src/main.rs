use datastore::InMemoryRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use video_service::{API_ROOT, ServiceConfig, create_router};

const DEFAULT_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_API_KEY: &str = "dev-key";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = std::env::var("VIDEO_SERVICE_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;
    let api_key =
        std::env::var("VIDEO_SERVICE_API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string());

    let repo = Arc::new(InMemoryRepository::new());
    let app = create_router(ServiceConfig::new(api_key), repo);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Stub video service listening on http://{}{}", addr, API_ROOT);

    axum::serve(listener, app).await?;

    Ok(())
}
