use axum::{
    routing::{get, post},
    Router,
    extract::{Json, State},
    response::{Html, Response},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;

use crate::api::models::{NewsRequest, SummarizeRequest, SummaryResponse};
use crate::api::response;
use crate::digest;
use crate::AppState;

const INDEX_HTML: &str = include_str!("index.html");

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/summarize", post(summarize_handler))
        .route("/api/news", post(news_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn summarize_handler(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> Response {
    let result = digest::summarize_url(&state, &req.url, req.api_key.as_deref()).await;
    response::from_result::<SummaryResponse, _>("summarize", result)
}

async fn news_handler(
    State(state): State<AppState>,
    Json(req): Json<NewsRequest>,
) -> Response {
    let result = digest::read_news(&state, req.api_key.as_deref()).await;
    response::from_result::<SummaryResponse, _>("news", result)
}
