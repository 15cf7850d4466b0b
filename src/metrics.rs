//! prometheus meters for the webhook receiver

use prometheus::{
	exponential_buckets, histogram_opts, opts, HistogramTimer, HistogramVec, IntCounter,
	IntCounterVec, Registry,
};

/// namespace of all our meters
pub const NAMESPACE: &str = crate::APPLICATION;

/// handler label of the webhook endpoint
pub const WEBHOOK_HANDLER: &str = "webhook";

#[derive(Debug, Clone)]
/// prometheus meters for notification processing. Counters are atomic, clones
/// share the same meters.
pub struct NotificationMetrics {
	/// every notification received, valid or not
	received: IntCounter,
	/// notifications rejected because of the caller's payload
	invalid: IntCounter,
	/// notifications that failed during processing and should be retried
	errored: IntCounter,
	/// http requests by handler, method and response status
	http_requests: IntCounterVec,
	/// time spent handling http requests
	http_request_duration: HistogramVec,
}

impl NotificationMetrics {
	/// construct prometheus meters and register them on `registry`
	pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
		let received = IntCounter::with_opts(
			opts!("notifications_received_total", "Total number of alert notifications received")
				.namespace(NAMESPACE),
		)?;

		let invalid = IntCounter::with_opts(
			opts!(
				"notifications_invalid_total",
				"Total number of invalid alert notifications received"
			)
			.namespace(NAMESPACE),
		)?;

		let errored = IntCounter::with_opts(
			opts!(
				"notifications_errored_total",
				"Total number of alert notifications that errored during processing and should be retried"
			)
			.namespace(NAMESPACE),
		)?;

		let http_requests = IntCounterVec::new(
			opts!("http_requests_total", "Total number of http requests").namespace(NAMESPACE),
			&["handler", "method", "code"],
		)?;

		let http_request_duration = HistogramVec::new(
			histogram_opts!(
				"http_request_duration_seconds",
				"total time of a http request in seconds",
				exponential_buckets(0.005, 2., 12)?
			)
			.namespace(NAMESPACE),
			&["handler"],
		)?;

		registry.register(Box::new(received.clone()))?;
		registry.register(Box::new(invalid.clone()))?;
		registry.register(Box::new(errored.clone()))?;
		registry.register(Box::new(http_requests.clone()))?;
		registry.register(Box::new(http_request_duration.clone()))?;

		Ok(Self { received, invalid, errored, http_requests, http_request_duration })
	}

	pub fn record_received(&self) {
		self.received.inc();
	}

	pub fn record_invalid(&self) {
		self.invalid.inc();
	}

	pub fn record_errored(&self) {
		self.errored.inc();
	}

	pub fn received(&self) -> u64 {
		self.received.get()
	}

	pub fn invalid(&self) -> u64 {
		self.invalid.get()
	}

	pub fn errored(&self) -> u64 {
		self.errored.get()
	}

	/// starts measuring a request, the duration is observed once the timer is dropped
	pub fn start_request_timer(&self, handler: &str) -> HistogramTimer {
		self.http_request_duration.with_label_values(&[handler]).start_timer()
	}

	/// counts a finished http request
	pub fn record_request(&self, handler: &str, method: &str, status: http::StatusCode) {
		self.http_requests.with_label_values(&[handler, method, status.as_str()]).inc();
	}
}
