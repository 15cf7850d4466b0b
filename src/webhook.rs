//! the alertmanager webhook receiver. Validates incoming notifications, stamps
//! them with their receipt time and writes them into elasticsearch.
//!
//! Nothing is retried or queued here, alertmanager retries notifications we
//! answer with a 5xx.
use std::{sync::Arc, time::Duration};

use axum::{
	extract::{Extension, RawBody},
	http::{Method, StatusCode},
	response::{IntoResponse, Response},
};
use bytes::Bytes;
use hyper::body::HttpBody;
use thiserror::Error;

use crate::{
	alert::{Notification, SUPPORTED_WEBHOOK_VERSION},
	clock::{self, Clock},
	elasticsearch::{self, ElasticsearchError, IndexTarget},
	metrics::{NotificationMetrics, WEBHOOK_HANDLER},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// who is at fault for a failed notification
pub enum ErrorKind {
	/// the caller sent something we can't store, retrying won't help
	InvalidRequest,
	/// reading, encoding or writing failed, the caller should retry
	Transient,
}

#[derive(Error, Debug)]
pub enum WebhookError {
	#[error("got empty request body")]
	EmptyBody,
	#[error("failed to read request body: {0}")]
	ReadBody(#[source] hyper::Error),
	#[error("timed out reading request body after {0:?}")]
	ReadTimeout(Duration),
	#[error("failed to parse notification: {0}")]
	Deserialize(#[source] serde_json::Error),
	#[error("Do not understand webhook version {received:?}, only version {expected:?} is supported.")]
	UnsupportedVersion { received: String, expected: &'static str },
	#[error("failed to encode notification: {0}")]
	Serialize(#[source] serde_json::Error),
	#[error(transparent)]
	Elasticsearch(#[from] ElasticsearchError),
}

impl WebhookError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			WebhookError::EmptyBody
			| WebhookError::Deserialize(_)
			| WebhookError::UnsupportedVersion { .. } => ErrorKind::InvalidRequest,
			WebhookError::ReadBody(_)
			| WebhookError::ReadTimeout(_)
			| WebhookError::Serialize(_)
			| WebhookError::Elasticsearch(_) => ErrorKind::Transient,
		}
	}

	pub fn status_code(&self) -> StatusCode {
		match self.kind() {
			ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
			ErrorKind::Transient => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for WebhookError {
	fn into_response(self) -> Response {
		(self.status_code(), self.to_string()).into_response()
	}
}

/// everything needed to turn a request into an elasticsearch document. Built
/// once and shared between all requests.
#[derive(Debug)]
pub struct Receiver {
	settings: elasticsearch::ElasticsearchSettings,
	client: elasticsearch::Client,
	clock: Arc<dyn Clock>,
	metrics: NotificationMetrics,
	read_timeout: Duration,
}

impl Receiver {
	pub fn new(
		settings: elasticsearch::ElasticsearchSettings,
		client: elasticsearch::Client,
		clock: Arc<dyn Clock>,
		metrics: NotificationMetrics,
		read_timeout: Duration,
	) -> Self {
		Self { settings, client, clock, metrics, read_timeout }
	}

	pub fn metrics(&self) -> &NotificationMetrics {
		&self.metrics
	}

	/// handle a single notification, counting it as received and, if it fails,
	/// as either invalid or errored
	pub async fn receive(&self, body: hyper::Body) -> Result<IndexTarget, WebhookError> {
		self.metrics.record_received();

		let result = self.process(body).await;

		match &result {
			Ok(target) => {
				tracing::debug!(index = %target.index, "stored alert notification");
			}
			Err(err) => match err.kind() {
				ErrorKind::InvalidRequest => {
					self.metrics.record_invalid();
					tracing::warn!("rejected alert notification: {}", err);
				}
				ErrorKind::Transient => {
					self.metrics.record_errored();
					tracing::error!("failed to store alert notification: {}", err);
				}
			},
		}

		result
	}

	async fn process(&self, body: hyper::Body) -> Result<IndexTarget, WebhookError> {
		if body.is_end_stream() {
			return Err(WebhookError::EmptyBody);
		}

		let bytes = self.read_body(body).await?;
		if bytes.is_empty() {
			return Err(WebhookError::EmptyBody);
		}

		let mut notification: Notification =
			serde_json::from_slice(&bytes).map_err(WebhookError::Deserialize)?;

		if !notification.is_supported_version() {
			return Err(WebhookError::UnsupportedVersion {
				received: notification.version,
				expected: SUPPORTED_WEBHOOK_VERSION,
			});
		}

		let received = self.clock.now();
		notification.timestamp = clock::format_timestamp(&received);

		let target = IndexTarget::at(&self.settings, &received);

		let document = serde_json::to_vec(&notification).map_err(WebhookError::Serialize)?;

		self.client.index_document(&target, document).await?;

		Ok(target)
	}

	async fn read_body(&self, body: hyper::Body) -> Result<Bytes, WebhookError> {
		tokio::time::timeout(self.read_timeout, hyper::body::to_bytes(body))
			.await
			.map_err(|_| WebhookError::ReadTimeout(self.read_timeout))?
			.map_err(WebhookError::ReadBody)
	}
}

/// `POST /webhook`
pub async fn webhook_handler(
	Extension(receiver): Extension<Arc<Receiver>>,
	method: Method,
	RawBody(body): RawBody,
) -> Response {
	let _timer = receiver.metrics().start_request_timer(WEBHOOK_HANDLER);

	let response = match receiver.receive(body).await {
		Ok(_) => StatusCode::OK.into_response(),
		Err(err) => err.into_response(),
	};

	receiver.metrics().record_request(WEBHOOK_HANDLER, method.as_str(), response.status());

	response
}
