//! Immich-compatible prediction endpoint.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{DefaultBodyLimit, FromRequest, Request, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{middleware, Json, Router};
use photo_bridge_common::{ClipPrediction, OcrPrediction};
use tracing::Instrument;
use uuid::Uuid;

use crate::auth;
use crate::error::{Error, Result};
use crate::pipeline::{self, DownstreamCall, PredictRequest, Route};
use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .with_state(state)
}

/// POST /predict - classify, translate, call downstream, normalize.
async fn predict(State(state): State<Arc<AppState>>, request: Request) -> Result<Response> {
    let span = tracing::info_span!("predict", request_id = %Uuid::new_v4());
    handle_predict(state, request).instrument(span).await
}

async fn handle_predict(state: Arc<AppState>, request: Request) -> Result<Response> {
    let (parts, body) = request.into_parts();

    // Buffer once: binding consumes a copy, passthrough forwards the original.
    let body = read_body(&parts, body, state.config.max_body_bytes).await?;
    let predict_request = PredictRequest::bind(&parts, body.clone()).await?;

    let route = Route::classify(&predict_request.entries)?;
    tracing::info!(
        route = %route,
        tasks = ?predict_request.entries.tasks(),
        has_image = predict_request.image.is_some(),
        has_text = predict_request.text.is_some(),
        "Classified prediction request"
    );

    match DownstreamCall::build(route, &predict_request)? {
        DownstreamCall::Ocr(image) => {
            let result = state.ocr_client.recognize(image).await?;
            Ok(Json(OcrPrediction::from(result)).into_response())
        }
        DownstreamCall::ClipText(payload) => {
            let result = state.clip_client.encode_text(&payload).await?;
            Ok(Json(ClipPrediction::from(result)).into_response())
        }
        DownstreamCall::ClipImage(image) => {
            let result = state.clip_client.encode_image(image).await?;
            Ok(Json(ClipPrediction::from(result)).into_response())
        }
        DownstreamCall::Passthrough => {
            let path_and_query = parts
                .uri
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/predict");
            let forwarded = state
                .inference_client
                .forward(parts.method.clone(), path_and_query, &parts.headers, body)
                .await?;

            tracing::debug!(status = %forwarded.status.as_u16(), "Relaying passthrough response");
            Ok(forwarded.into_response())
        }
    }
}

/// Buffer the whole body under the route's `DefaultBodyLimit`.
async fn read_body(parts: &Parts, body: Body, limit: usize) -> Result<Bytes> {
    Bytes::from_request(pipeline::replay(parts, body), &())
        .await
        .map_err(|rejection| match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => Error::PayloadTooLarge(limit),
            _ => Error::InvalidRequest(rejection.body_text()),
        })
}
