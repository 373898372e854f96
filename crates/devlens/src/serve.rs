use crate::prelude::{println, *};
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use devlens_core::serve::{content_type_for, display_relative, resolve_target, NOT_FOUND_BODY};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Directory to serve
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}

/// Read-only state shared by every request.
#[derive(Debug)]
pub struct ServeState {
    pub root: PathBuf,
}

pub async fn run(options: ServeOptions, _global: crate::Global) -> Result<()> {
    let root = options
        .root
        .canonicalize()
        .with_context(|| format!("Root directory does not exist: {}", options.root.display()))?;

    if !root.is_dir() {
        return Err(eyre!("Root path is not a directory: {}", root.display()));
    }

    let addr = format!("{}:{}", options.host, options.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    println!("Development server running at http://{}/", addr);
    println!("Serving files from: {}", root.display());
    println!("Press Ctrl+C to stop");

    axum::serve(listener, router(root))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

/// Every path goes to the same handler; GET and HEAD only.
pub fn router(root: PathBuf) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(serve_file))
        .route("/{*path}", get(serve_file))
        .layer(cors)
        .with_state(Arc::new(ServeState { root }))
}

async fn serve_file(State(state): State<Arc<ServeState>>, uri: Uri) -> Response {
    let url_path = uri.path();

    let target = match resolve_target(&state.root, url_path) {
        Ok(target) => target,
        Err(err) => {
            log::warn!("{err}");
            return not_found(url_path);
        }
    };

    match tokio::fs::read(&target).await {
        Ok(bytes) => {
            log::info!(
                "200: {} -> {}",
                url_path,
                display_relative(&state.root, &target)
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type_for(&target))],
                bytes,
            )
                .into_response()
        }
        Err(err) => {
            log::debug!("Failed to read {}: {err}", target.display());
            not_found(url_path)
        }
    }
}

fn not_found(url_path: &str) -> Response {
    log::info!("404: {url_path}");
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/html")],
        NOT_FOUND_BODY,
    )
        .into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}
