mod handlers;
mod render;
mod types;

pub use handlers::AppState;
pub use types::{SummarizeForm, SummarizedArticle};

use std::net::SocketAddr;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::Result;

/// Builds the application router. Requests that outlive `request_timeout`
/// are answered with 408, mirroring the worker timeout of the deployment.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/summarize", post(handlers::summarize))
        .layer((
            TraceLayer::new_for_http(),
            TimeoutLayer::new(request_timeout),
        ))
        .with_state(state)
}

pub async fn run(config: &Config, state: AppState) -> Result<()> {
    let app = router(
        state,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
