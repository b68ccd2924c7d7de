//! HTTP boundary: `POST /predict` and `GET /health`.

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::service::{self, PredictContext};
use crate::sources::Location;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(rename = "manualRain")]
    pub manual_rain: Option<f64>,
}

/// Error body `{"error": "..."}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

pub fn router(ctx: PredictContext) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .with_state(Arc::new(ctx))
}

/// Bind and serve until the process is stopped.
pub async fn serve(ctx: PredictContext, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    eprintln!("Listening on http://{}", addr);
    axum::serve(listener, router(ctx))
        .await
        .context("HTTP server failed")
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn predict(
    State(ctx): State<Arc<PredictContext>>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<service::PredictResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let (Some(lat), Some(lng)) = (request.lat, request.lng) else {
        return Err(ApiError::bad_request("Latitude and longitude are required"));
    };

    let started = std::time::Instant::now();
    let response = service::predict(&ctx, Location { lat, lng }, request.manual_rain)
        .await
        .map_err(|e| match e.downcast_ref::<service::InvalidInput>() {
            Some(invalid) => ApiError::bad_request(invalid.to_string()),
            None => {
                crate::warn_eprintln!("Prediction failed for {}, {}: {:#}", lat, lng, e);
                ApiError::internal("Prediction failed")
            }
        })?;
    crate::debug_eprintln!(
        "POST /predict {}, {} -> {} in {:?}",
        lat,
        lng,
        response.prediction.level,
        started.elapsed()
    );

    Ok(Json(response))
}
