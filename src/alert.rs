//! data structures for deserializing incoming alert notifications and
//! serializing them into elasticsearch documents
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{serde_as, DefaultOnNull};

/// the only alertmanager webhook payload version we understand
pub const SUPPORTED_WEBHOOK_VERSION: &str = "4";

/// label and annotation maps keep the key order alertmanager sent them in
pub type KeyValues = IndexMap<String, String>;

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
/// alert group notification received by the alertmanager webhook receiver,
/// stored as a single document in elasticsearch
///
/// fields sent as `null` decode to their empty value, same as missing ones
pub struct Notification {
	/// version of the webhook payload schema
	#[serde_as(as = "DefaultOnNull")]
	pub version: String,
	/// key identifying the alert group
	#[serde_as(as = "DefaultOnNull")]
	pub group_key: String,
	/// name of the alertmanager receiver that sent the notification
	#[serde_as(as = "DefaultOnNull")]
	pub receiver: String,
	/// `firing` or `resolved`
	#[serde_as(as = "DefaultOnNull")]
	pub status: String,
	#[serde_as(as = "DefaultOnNull")]
	pub alerts: Vec<Alert>,
	#[serde_as(as = "DefaultOnNull")]
	pub group_labels: KeyValues,
	#[serde_as(as = "DefaultOnNull")]
	pub common_labels: KeyValues,
	#[serde_as(as = "DefaultOnNull")]
	pub common_annotations: KeyValues,
	#[serde(rename = "externalURL")]
	#[serde_as(as = "DefaultOnNull")]
	pub external_url: String,
	/// point in time the notification was received, always set by us
	#[serde(rename = "@timestamp")]
	#[serde_as(as = "DefaultOnNull")]
	pub timestamp: String,
	/// fields newer alertmanager versions send which we pass through untouched
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
/// a single firing or resolved alert of a [Notification]
pub struct Alert {
	#[serde_as(as = "DefaultOnNull")]
	pub status: String,
	#[serde_as(as = "DefaultOnNull")]
	pub labels: KeyValues,
	#[serde_as(as = "DefaultOnNull")]
	pub annotations: KeyValues,
	/// kept as sent, we never reinterpret alert timestamps
	#[serde_as(as = "DefaultOnNull")]
	pub starts_at: String,
	#[serde_as(as = "DefaultOnNull")]
	pub ends_at: String,
	#[serde(rename = "generatorURL")]
	#[serde_as(as = "DefaultOnNull")]
	pub generator_url: String,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Notification {
	/// whether alertmanager sent a payload version we know how to store
	pub fn is_supported_version(&self) -> bool {
		self.version == SUPPORTED_WEBHOOK_VERSION
	}
}
