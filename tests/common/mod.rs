//! shared setup for driving the router against a mocked elasticsearch
#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use alertmanager2es::{
	clock::{Clock, FixedClock},
	credentials::StaticCredentials,
	elasticsearch::{self, ElasticsearchSettings},
	metrics::NotificationMetrics,
	server::create_router,
	webhook::Receiver,
};
use axum::{
	body::Body,
	http::{Request, StatusCode},
	Router,
};
use chrono::{DateTime, FixedOffset};
use prometheus::Registry;
use tower::ServiceExt;
use url::Url;

/// alert group notification as sent by alertmanager
pub const NOTIFICATION: &str = r#"{
	"alerts": [
		{
			"annotations": {
				"link": "https://example.com/Foo+Bar",
				"summary": "Alert summary"
			},
			"endsAt": "0001-01-01T00:00:00Z",
			"generatorURL": "https://example.com",
			"labels": {
				"alertname": "Foo_Bar",
				"instance": "foo"
			},
			"startsAt": "2017-02-02T16:51:13.507955756Z",
			"status": "firing"
		}
	],
	"commonAnnotations": {
		"link": "https://example.com/Foo+Bar",
		"summary": "Alert summary"
	},
	"commonLabels": {
		"alertname": "Foo_Bar",
		"instance": "foo"
	},
	"externalURL": "https://alertmanager.example.com",
	"groupLabels": {
		"alertname": "Foo_Bar"
	},
	"receiver": "alertmanager2es",
	"status": "firing",
	"version": "4",
	"groupKey": "{}/{}/{notify=\"default\":{alertname=\"Foo_Bar\", instance=\"foo\"}"
}"#;

/// document path for notifications received at [received_at]
pub const DOCUMENT_PATH: &str = "/alertmanager-2017.02/alert_group";

pub fn received_at() -> DateTime<FixedOffset> {
	DateTime::parse_from_rfc3339("2017-02-02T19:37:22+01:00").unwrap()
}

pub fn settings(es_url: &str) -> ElasticsearchSettings {
	ElasticsearchSettings {
		url: Url::parse(es_url).unwrap(),
		index_name: "alertmanager".to_owned(),
		index_date_format: "%Y.%m".to_owned(),
		doc_type: "alert_group".to_owned(),
		timeout: Duration::from_secs(10),
	}
}

pub struct TestApp {
	pub router: Router,
	pub receiver: Arc<Receiver>,
	pub registry: Registry,
}

impl TestApp {
	pub fn new(es_url: &str) -> Self {
		Self::with(es_url, Arc::new(FixedClock(received_at())), StaticCredentials::default())
	}

	pub fn with(es_url: &str, clock: Arc<dyn Clock>, credentials: StaticCredentials) -> Self {
		Self::build(es_url, clock, credentials, Duration::from_secs(10))
	}

	pub fn with_read_timeout(es_url: &str, read_timeout: Duration) -> Self {
		Self::build(
			es_url,
			Arc::new(FixedClock(received_at())),
			StaticCredentials::default(),
			read_timeout,
		)
	}

	fn build(
		es_url: &str,
		clock: Arc<dyn Clock>,
		credentials: StaticCredentials,
		read_timeout: Duration,
	) -> Self {
		let settings = settings(es_url);
		let registry = Registry::new();
		let metrics = NotificationMetrics::register(&registry).unwrap();
		let client = elasticsearch::Client::new(
			&settings,
			alertmanager2es::VERSION.as_str(),
			Arc::new(credentials),
		)
		.unwrap();

		let receiver = Arc::new(Receiver::new(
			settings,
			client,
			clock,
			metrics,
			read_timeout,
		));

		Self { router: create_router(receiver.clone(), registry.clone()), receiver, registry }
	}

	pub async fn request(&self, request: Request<Body>) -> (StatusCode, String) {
		let response = self.router.clone().oneshot(request).await.unwrap();
		let status = response.status();
		let body = hyper::body::to_bytes(response.into_body()).await.unwrap();

		(status, String::from_utf8(body.to_vec()).unwrap())
	}

	pub async fn post_webhook(&self, body: impl Into<Body>) -> (StatusCode, String) {
		let request = Request::builder()
			.method("POST")
			.uri("/webhook")
			.header("content-type", "application/json")
			.body(body.into())
			.unwrap();

		self.request(request).await
	}

	/// (received, invalid, errored)
	pub fn counters(&self) -> (u64, u64, u64) {
		let metrics = self.receiver.metrics();
		(metrics.received(), metrics.invalid(), metrics.errored())
	}
}
