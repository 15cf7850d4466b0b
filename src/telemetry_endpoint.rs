//! Here we expose prometheus metrics and the version of alertmanager2es
use axum::{
	extract::Extension,
	http::{header::CONTENT_TYPE, StatusCode},
	response::{IntoResponse, Response},
};
use prometheus::{Encoder, Registry, TextEncoder};

use crate::VERSION;

/// `GET /`
pub async fn version_handler() -> &'static str {
	VERSION.as_str()
}

/// `GET /metrics`
pub async fn metrics_handler(Extension(registry): Extension<Registry>) -> Response {
	let mut buffer = vec![];
	let encoder = TextEncoder::new();
	let metric_families = registry.gather();

	if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
		tracing::error!("failed to encode prometheus metrics: {}", err);
		return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
	}

	([(CONTENT_TYPE, encoder.format_type().to_owned())], buffer).into_response()
}
