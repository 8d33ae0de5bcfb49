use crate::app::service::MealStretchService;
use crate::app::wire::{CoordinateQuery, ErrorBody, GeocodeQuery, PlanMealBody};
use crate::utils::error::{AppError, ErrorSeverity, Result};
use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::net::SocketAddr;
use tokio::net::TcpListener;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self.severity() {
            ErrorSeverity::Low => tracing::info!("↩️ {} {}", status.as_u16(), self),
            ErrorSeverity::Medium => tracing::warn!("⚠️ {} {}", status.as_u16(), self),
            ErrorSeverity::High | ErrorSeverity::Critical => {
                tracing::error!(
                    "❌ {} {} (Category: {:?}, Severity: {:?})",
                    status.as_u16(),
                    self,
                    self.category(),
                    self.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", self.recovery_suggestion());
            }
        }

        let body = ErrorBody {
            error: self.user_friendly_message(),
        };
        (status, Json(body)).into_response()
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::invalid_input(format!("Request body must be valid JSON: {}", e)))
}

async fn health(State(service): State<MealStretchService>) -> impl IntoResponse {
    Json(service.health())
}

async fn inventory(State(service): State<MealStretchService>) -> impl IntoResponse {
    Json(service.inventory())
}

async fn plan_meal(
    State(service): State<MealStretchService>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let body: PlanMealBody = parse_json(&body)?;
    Ok(Json(service.plan_meal(body).await?))
}

async fn nearby_stores(
    State(service): State<MealStretchService>,
    Query(query): Query<CoordinateQuery>,
) -> Result<impl IntoResponse> {
    Ok(Json(service.nearby_stores(&query).await?))
}

async fn geocode(
    State(service): State<MealStretchService>,
    Query(query): Query<GeocodeQuery>,
) -> Result<impl IntoResponse> {
    Ok(Json(service.geocode(&query).await?))
}

async fn narrate(
    State(service): State<MealStretchService>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let body: Value = parse_json(&body)?;
    let audio = service.narrate(&body).await?;
    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], Body::from_stream(audio)))
}

pub fn router(service: MealStretchService) -> Router {
    Router::new()
        .route("/api", get(health))
        .route("/api/inventory", get(inventory))
        .route("/api/plan-meal", post(plan_meal))
        .route("/api/nearby-stores", get(nearby_stores))
        .route("/api/geocode", get(geocode))
        .route("/api/narrate", post(narrate))
        .with_state(service)
}

/// 在已綁定的 listener 上提供服務（測試用 port 0）
pub async fn serve_on(listener: TcpListener, service: MealStretchService) -> Result<()> {
    let local = listener.local_addr()?;
    tracing::info!("🚀 MealStretch API listening on http://{}", local);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

pub async fn serve(service: MealStretchService, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, service).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
