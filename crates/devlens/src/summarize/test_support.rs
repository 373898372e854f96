use axum::Router;

use super::config::{Backend, SummarizerConfig};

/// Serve `router` on an ephemeral local port and return its origin.
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// An origin nothing is listening on.
pub fn closed_origin() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn config(base_url: String, backend: Backend) -> SummarizerConfig {
    SummarizerConfig::new(
        Some("sk-test".to_string()),
        "claude-test".to_string(),
        256,
        base_url,
        backend,
    )
    .unwrap()
}
