//! prometheus alertmanager receiver that stores alert notifications in
//! elasticsearch
//!
//! Every notification alertmanager sends to `/webhook` is stamped with the
//! time it was received and written as a single document into a time bucketed
//! index (`alertmanager-2017.02` by default). Failures are reported back to
//! alertmanager, which takes care of retrying.

use once_cell::sync::Lazy;

pub mod alert;
pub mod clock;
pub mod credentials;
pub mod elasticsearch;
pub mod log;
pub mod metrics;
pub mod server;
pub mod settings;
pub mod telemetry_endpoint;
pub mod webhook;

/// name we identify as, towards elasticsearch and in our meters
pub const APPLICATION: &str = "alertmanager2es";

/// compiler version captured by the build script
pub const RUSTC_VERSION: &str = env!("ALERTMANAGER2ES_RUSTC_VERSION");

/// `alertmanager2es <revision> (rust<rustc version>)`. The revision can be set at
/// build time through `ALERTMANAGER2ES_REVISION`.
pub static VERSION: Lazy<String> = Lazy::new(|| {
	let revision = option_env!("ALERTMANAGER2ES_REVISION").unwrap_or(env!("CARGO_PKG_VERSION"));

	format!("{} {} (rust{})", APPLICATION, revision, RUSTC_VERSION)
});
