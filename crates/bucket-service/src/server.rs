//! HTTP server for the bucket order API.
//!
//! This module wires the menu and order endpoints into an axum router and
//! serves it with the configured CORS policy.

use axum::{
	extract::{Path, State},
	http::{header, HeaderValue, Method},
	response::Json,
	routing::{get, post},
	Router,
};
use bucket_config::{ApiConfig, CorsConfig};
use bucket_core::OrderLifecycle;
use bucket_types::{
	APIError, BucketRequest, MenuResponse, OrderActionRequest, OrderRecord, OrderResponse,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Order lifecycle serving every request.
	pub lifecycle: Arc<OrderLifecycle>,
}

/// Starts the HTTP server for the API.
///
/// Runs until the process receives Ctrl+C.
pub async fn start_server(
	api_config: ApiConfig,
	lifecycle: Arc<OrderLifecycle>,
) -> Result<(), Box<dyn std::error::Error>> {
	let cors = build_cors_layer(api_config.cors.as_ref())?;
	let app = build_router(AppState { lifecycle }, cors);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Bucket API server starting on {}", bind_address);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

/// Builds the API router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
	Router::new()
		.route("/menu", get(handle_menu))
		.route("/bucket", post(handle_bucket))
		.route("/confirm", post(handle_confirm))
		.route("/cancel", post(handle_cancel))
		.route("/orders/{id}", get(handle_get_order_by_id))
		.layer(ServiceBuilder::new().layer(cors))
		.with_state(state)
}

/// Builds the CORS layer.
///
/// Without configured origins every origin is allowed.
pub fn build_cors_layer(
	cors: Option<&CorsConfig>,
) -> Result<CorsLayer, header::InvalidHeaderValue> {
	let Some(cors) = cors else {
		return Ok(CorsLayer::permissive());
	};

	let origins = cors
		.allowed_origins
		.iter()
		.map(|origin| HeaderValue::from_str(origin))
		.collect::<Result<Vec<_>, _>>()?;

	Ok(CorsLayer::new()
		.allow_origin(AllowOrigin::list(origins))
		.allow_methods([Method::GET, Method::POST])
		.allow_headers([header::CONTENT_TYPE]))
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!("Failed to listen for shutdown signal: {}", e);
		return;
	}
	tracing::info!("Shutdown signal received");
}

/// Handles GET /menu requests.
async fn handle_menu(State(state): State<AppState>) -> Json<MenuResponse> {
	Json(crate::apis::menu::get_menu(&state.lifecycle))
}

/// Handles POST /bucket requests.
async fn handle_bucket(
	State(state): State<AppState>,
	Json(request): Json<BucketRequest>,
) -> Result<Json<OrderResponse>, APIError> {
	crate::apis::order::submit_bucket(request, &state.lifecycle)
		.await
		.map(Json)
}

/// Handles POST /confirm requests.
async fn handle_confirm(
	State(state): State<AppState>,
	Json(request): Json<OrderActionRequest>,
) -> Result<Json<OrderResponse>, APIError> {
	crate::apis::order::confirm_order(request, &state.lifecycle)
		.await
		.map(Json)
}

/// Handles POST /cancel requests.
async fn handle_cancel(
	State(state): State<AppState>,
	Json(request): Json<OrderActionRequest>,
) -> Result<Json<OrderResponse>, APIError> {
	crate::apis::order::cancel_order(request, &state.lifecycle)
		.await
		.map(Json)
}

/// Handles GET /orders/{id} requests.
async fn handle_get_order_by_id(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<OrderRecord>, APIError> {
	crate::apis::order::get_order_by_id(&id, &state.lifecycle)
		.await
		.map(Json)
}
