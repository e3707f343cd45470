use crate::details::load_details;
use crate::error::ErrorKind;
use crate::models::MovieSummary;
use crate::omdb::{OmdbApi, OmdbClient};
use crate::search::search_once;
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const LISTEN_PORT: u16 = 3147;

#[derive(Clone)]
pub struct AppState {
    pub omdb: Arc<dyn OmdbApi>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
struct SearchBody {
    movies: Vec<MovieSummary>,
    error: Option<String>,
}

pub async fn run_server() -> Result<()> {
    let omdb: Arc<dyn OmdbApi> = Arc::new(OmdbClient::from_env()?);
    let app = build_router(AppState { omdb });

    let addr = SocketAddr::from(([0, 0, 0, 0], LISTEN_PORT));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/search", get(search_movies))
        .route("/api/movie/:id", get(movie_details))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> (StatusCode, Json<SearchBody>) {
    match search_once(state.omdb.as_ref(), &params.q).await {
        Ok(movies) => (
            StatusCode::OK,
            Json(SearchBody {
                movies,
                error: None,
            }),
        ),
        Err(err) => (
            status_for(err.kind),
            Json(SearchBody {
                movies: Vec::new(),
                error: Some(err.message),
            }),
        ),
    }
}

async fn movie_details(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match load_details(state.omdb.as_ref(), &id).await {
        Ok(details) => (StatusCode::OK, Json(details)).into_response(),
        Err(err) => (status_for(err.kind), Json(json!({ "error": err.message }))).into_response(),
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ConnectionError | ErrorKind::Unknown => StatusCode::BAD_GATEWAY,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
