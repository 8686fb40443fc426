use mock_server::{Item, MockState, DEFAULT_TOKEN};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let token = std::env::var("MOCK_TOKEN").unwrap_or_else(|_| DEFAULT_TOKEN.to_string());
    let state = MockState::new(&token).with_items(vec![
        Item::new("1", "**Welcome** to the mock inbox"),
        Item::new("2", "Read [the docs](https://developer.todoist.com)"),
        Item::new("3", "- [ ] pack\n- [ ] ship"),
    ]);

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, path = mock_server::SYNC_PATH, "listening");
    mock_server::run_with(listener, Arc::new(RwLock::new(state))).await
}
