use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::{error, info, warn};

use crate::domain::models::validate_property_id;
use crate::AppState;

/// Create a router for availability related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/:property_id/availability", get(get_availability))
}

/// Get the booked and checkout-only dates of a property
async fn get_availability(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/properties/{}/availability", property_id);

    if let Err(e) = validate_property_id(&property_id) {
        warn!("Rejected availability request: {}", e);
        return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
    }

    match state.availability_source.load_availability(&property_id).await {
        Ok(response) => {
            info!(
                "Returning availability for {}: {} booked, {} checkout-only",
                property_id,
                response.booked_dates.len(),
                response.checkout_only_dates.len()
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to load availability for {}: {:#}", property_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{AvailabilitySource, InMemoryAvailabilitySource};
    use anyhow::Result;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use shared::AvailabilityResponse;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(source: Arc<dyn AvailabilitySource>) -> Router {
        Router::new()
            .nest("/api/properties", router())
            .with_state(AppState { availability_source: source })
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_get_availability() {
        let source = Arc::new(InMemoryAvailabilitySource::new());
        source.set_availability(AvailabilityResponse {
            property_id: "cabin".to_string(),
            booked_dates: vec!["2024-06-15".to_string()],
            checkout_only_dates: vec!["2024-06-17".to_string()],
        });

        let (status, body) = get(app(source), "/api/properties/cabin/availability").await;
        assert_eq!(status, StatusCode::OK);

        let response: AvailabilityResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.property_id, "cabin");
        assert_eq!(response.booked_dates, vec!["2024-06-15".to_string()]);
        assert_eq!(response.checkout_only_dates, vec!["2024-06-17".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_property_is_empty() {
        let (status, body) = get(
            app(Arc::new(InMemoryAvailabilitySource::new())),
            "/api/properties/nowhere/availability",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let response: AvailabilityResponse = serde_json::from_slice(&body).unwrap();
        assert!(response.booked_dates.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_property_id_is_rejected() {
        let (status, _) = get(
            app(Arc::new(InMemoryAvailabilitySource::new())),
            "/api/properties/%2E%2E/availability",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_source_failure_returns_error_text() {
        struct FailingSource;

        #[async_trait]
        impl AvailabilitySource for FailingSource {
            async fn load_availability(&self, _property_id: &str) -> Result<AvailabilityResponse> {
                Err(anyhow::anyhow!("bookings store offline"))
            }
        }

        let (status, body) = get(app(Arc::new(FailingSource)), "/api/properties/cabin/availability").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(String::from_utf8(body).unwrap(), "bookings store offline");
    }
}
