//! writes notification documents into time bucketed elasticsearch indices
use std::{sync::Arc, time::Duration};

use chrono::{
	format::{Item, StrftimeItems},
	DateTime, FixedOffset,
};
use http::header::{CONTENT_TYPE, USER_AGENT};
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use thiserror::Error;
use url::Url;

use crate::credentials::CredentialProvider;

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct ElasticsearchSettings {
	/// base url of the elasticsearch http api, may contain a path prefix
	pub url: Url,
	/// indices are named `{index_name}-{date}`
	pub index_name: String,
	/// strftime pattern for the date part of the index name, decides how
	/// large an index bucket is
	pub index_date_format: String,
	/// document type (`_type`) path segment
	pub doc_type: String,
	/// bound for a whole write, from connecting until the response body is read
	#[serde_as(as = "DurationSeconds<f64>")]
	pub timeout: Duration,
}

/// returns false if `pattern` contains anything chrono can't format
pub fn is_valid_date_format(pattern: &str) -> bool {
	!StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// index and document type a notification is written to
pub struct IndexTarget {
	pub index: String,
	pub doc_type: String,
}

impl IndexTarget {
	/// the index bucket for a notification received at `received`
	pub fn at(settings: &ElasticsearchSettings, received: &DateTime<FixedOffset>) -> Self {
		Self {
			index: format!(
				"{}-{}",
				settings.index_name,
				received.format(settings.index_date_format.as_str())
			),
			doc_type: settings.doc_type.clone(),
		}
	}

	pub fn path(&self) -> String {
		format!("{}/{}", self.index, self.doc_type)
	}
}

#[derive(Error, Debug)]
pub enum ElasticsearchError {
	#[error("POST to Elasticsearch on {url:?} failed: {source}")]
	Request {
		url: String,
		#[source]
		source: reqwest::Error,
	},
	#[error("failed to read response of Elasticsearch on {url:?}: {source}")]
	ReadResponse {
		url: String,
		#[source]
		source: reqwest::Error,
	},
	#[error("POST to Elasticsearch on {url:?} returned HTTP {status}: {body}")]
	Status { url: String, status: u16, body: String },
}

#[derive(Debug, Clone)]
/// elasticsearch http client. Cheap to clone, all clones share one
/// connection pool.
pub struct Client {
	/// http client
	client: reqwest::Client,
	/// base url with trailing slashes removed
	base_url: String,
	/// value of the `User-Agent` header
	user_agent: String,
	/// looked up before every write
	credentials: Arc<dyn CredentialProvider>,
}

impl Client {
	/// construct http client
	pub fn new(
		settings: &ElasticsearchSettings,
		user_agent: impl Into<String>,
		credentials: Arc<dyn CredentialProvider>,
	) -> Result<Self, reqwest::Error> {
		Ok(Self {
			client: reqwest::Client::builder().timeout(settings.timeout).build()?,
			base_url: settings.url.as_str().trim_end_matches('/').to_owned(),
			user_agent: user_agent.into(),
			credentials,
		})
	}

	pub fn document_url(&self, target: &IndexTarget) -> String {
		format!("{}/{}", self.base_url, target.path())
	}

	/// POST a serialized document, anything but a 2xx answer is an error
	pub async fn index_document(
		&self,
		target: &IndexTarget,
		document: Vec<u8>,
	) -> Result<(), ElasticsearchError> {
		let url = self.document_url(target);

		let mut request = self
			.client
			.post(url.as_str())
			.header(USER_AGENT, self.user_agent.as_str())
			.header(CONTENT_TYPE, "application/json")
			.body(document);

		if let Some(auth) = self.credentials.credentials() {
			request = request.basic_auth(auth.username, Some(auth.password));
		}

		let response = request
			.send()
			.await
			.map_err(|source| ElasticsearchError::Request { url: url.clone(), source })?;

		let status = response.status();
		let body = response
			.text()
			.await
			.map_err(|source| ElasticsearchError::ReadResponse { url: url.clone(), source })?;

		if !status.is_success() {
			return Err(ElasticsearchError::Status { url, status: status.as_u16(), body });
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::credentials::StaticCredentials;

	fn settings(url: &str) -> ElasticsearchSettings {
		ElasticsearchSettings {
			url: Url::parse(url).unwrap(),
			index_name: "alertmanager".to_owned(),
			index_date_format: "%Y.%m".to_owned(),
			doc_type: "alert_group".to_owned(),
			timeout: Duration::from_secs(10),
		}
	}

	fn received() -> DateTime<FixedOffset> {
		DateTime::parse_from_rfc3339("2017-02-02T19:37:22+01:00").unwrap()
	}

	#[test]
	fn index_is_bucketed_by_month() {
		let target = IndexTarget::at(&settings("http://localhost:9200"), &received());

		assert_eq!(target.index, "alertmanager-2017.02");
		assert_eq!(target.path(), "alertmanager-2017.02/alert_group");
	}

	#[test]
	fn index_bucket_uses_the_receipt_offset() {
		// the bucket follows the receipt offset, in utc this instant is still february
		let received = DateTime::parse_from_rfc3339("2017-03-01T00:30:00+01:00").unwrap();
		let target = IndexTarget::at(&settings("http://localhost:9200"), &received);

		assert_eq!(target.index, "alertmanager-2017.03");
	}

	#[test]
	fn daily_buckets() {
		let mut settings = settings("http://localhost:9200");
		settings.index_date_format = "%Y.%m.%d".to_owned();

		assert_eq!(IndexTarget::at(&settings, &received()).index, "alertmanager-2017.02.02");
	}

	#[test]
	fn validates_date_formats() {
		assert!(is_valid_date_format("%Y.%m"));
		assert!(is_valid_date_format("%Y-%V"));
		assert!(!is_valid_date_format("%Y.%"));
		assert!(!is_valid_date_format("%Q"));
	}

	#[test]
	fn document_url_handles_trailing_slash_and_prefix() {
		let target = IndexTarget::at(&settings("http://localhost:9200"), &received());
		let credentials = Arc::new(StaticCredentials::default());

		let client =
			Client::new(&settings("http://localhost:9200/"), "test", credentials.clone()).unwrap();
		assert_eq!(
			client.document_url(&target),
			"http://localhost:9200/alertmanager-2017.02/alert_group"
		);

		let client = Client::new(&settings("http://es.example.com/es/"), "test", credentials).unwrap();
		assert_eq!(
			client.document_url(&target),
			"http://es.example.com/es/alertmanager-2017.02/alert_group"
		);
	}
}
