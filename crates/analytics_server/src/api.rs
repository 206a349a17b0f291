use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};

use crate::{
    error::ApiError,
    models::{TrackRequest, TrackResponse},
    AppState,
};
use analytics_store::{AnalyticsSnapshot, NewPageView};

/// Recorded when no proxy header names the client
pub const UNKNOWN_IP: &str = "unknown";

// Basic handler that responds with a static string
pub async fn root() -> &'static str {
    "Hello, Docs Analytics API!"
}

/// Best-effort client address: the first entry of `X-Forwarded-For`, then
/// `X-Real-IP`, then [`UNKNOWN_IP`]
pub fn client_ip(headers: &HeaderMap) -> String {
    let forwarded = header_str(headers, "x-forwarded-for")
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    forwarded
        .or_else(|| {
            header_str(headers, "x-real-ip")
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
        })
        .unwrap_or(UNKNOWN_IP)
        .to_string()
}

/// Credential from an `Authorization: Bearer <code>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, header::AUTHORIZATION.as_str())?.strip_prefix("Bearer ")
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

// Record a page view. Tracking must never break the page that sent it, so
// anything that is a JSON object is accepted.
#[axum::debug_handler]
pub async fn track_page_view(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<TrackResponse>) {
    let value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Rejected page view with malformed body: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(TrackResponse { success: false }),
            );
        }
    };
    let Some(request) = TrackRequest::from_value(&value) else {
        tracing::warn!("Rejected page view whose body is not a JSON object");
        return (
            StatusCode::BAD_REQUEST,
            Json(TrackResponse { success: false }),
        );
    };

    let path = request.path.unwrap_or_default();
    if state.config.is_ignored_path(&path) {
        tracing::debug!("Ignoring page view for {}", path);
        return (StatusCode::OK, Json(TrackResponse { success: true }));
    }

    let view = NewPageView {
        path,
        ip: Some(client_ip(&headers)),
        user_agent: header_str(&headers, header::USER_AGENT.as_str()).map(str::to_string),
        referer: request.referer,
    };
    tracing::debug!("Tracking page view: {:?}", view);

    let timestamp = state.store.lock().await.record(view);
    tracing::trace!("Page view recorded at {}", timestamp);

    (StatusCode::OK, Json(TrackResponse { success: true }))
}

// Serve the aggregate payload to a caller holding the access code
#[axum::debug_handler]
pub async fn get_analytics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AnalyticsSnapshot>, ApiError> {
    let expected = state
        .config
        .access_code()
        .ok_or_else(|| ApiError::Internal("no access code configured".to_string()))?;

    if bearer_token(&headers) != Some(expected) {
        tracing::warn!("Rejected analytics query with invalid access code");
        return Err(ApiError::Unauthorized);
    }

    let snapshot = state.store.lock().await.snapshot();

    tracing::info!(
        "Serving analytics: {} total visits, {} in the last 24h",
        snapshot.total_visits,
        snapshot.last_24h_visits
    );

    Ok(Json(snapshot))
}
