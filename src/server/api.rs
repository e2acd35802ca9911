use crate::cli::Args;
use crate::models::chat::HealthResponse;
use crate::relay::Relay;
use std::sync::Arc;
use axum::{
    body::Bytes,
    routing::{ get, post },
    Router,
    extract::{ rejection::BytesRejection, DefaultBodyLimit, State },
    response::Response,
    Json,
};
use chrono::Utc;
use tower::ServiceBuilder;
use tower_http::cors::{ Any, CorsLayer };
use tower_http::services::ServeDir;
use log::info;

#[derive(Clone)]
struct AppState {
    relay: Arc<Relay>,
    environment: String,
    region: String,
}

/// Builds the HTTP surface: the chat relay, a health probe and, when a
/// static directory is configured, the pre-built UI for every other path.
pub fn router(relay: Arc<Relay>, args: &Args) -> Router {
    let app_state = AppState {
        relay,
        environment: args.environment.clone(),
        region: args.region.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/chat", post(chat_handler).layer(DefaultBodyLimit::max(args.max_body_bytes)))
        .route("/api/health", get(health_handler))
        .with_state(app_state);

    let app = match &args.static_dir {
        Some(dir) => {
            info!("Serving static UI from: {}", dir);
            app.fallback_service(ServeDir::new(dir))
        }
        None => app,
    };

    app.layer(ServiceBuilder::new().layer(cors))
}

async fn chat_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    state.relay.relay_chat(body).await
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        timestamp: Utc::now().to_rfc3339(),
        environment: state.environment.clone(),
        region: state.region.clone(),
        upstream: state.relay.endpoint().to_string(),
        max_duration_secs: state.relay.max_duration().as_secs(),
    })
}
