//! prometheus alertmanager receiver that stores alert notifications in
//! elasticsearch
//!
//! - one document per notification, stamped with the time it was received
//! - time bucketed indices (`{index name}-{date}`)
//! - failed writes are reported back so alertmanager can retry them
use std::sync::Arc;

use alertmanager2es::{
	clock::SystemClock,
	credentials::EnvCredentials,
	elasticsearch, log,
	metrics::NotificationMetrics,
	server,
	settings::{Invocation, Settings, SettingsError},
	webhook::Receiver,
	VERSION,
};
use anyhow::{Context, Result};

/// exit the complete program if one thread panics
fn setup_panic_handler() {
	let default_panic = std::panic::take_hook();
	std::panic::set_hook(Box::new(move |info| {
		default_panic(info);
		std::process::exit(1);
	}));
}

/// the entry point of the program
#[tokio::main]
pub async fn main() -> Result<()> {
	setup_panic_handler();

	let settings = match Settings::load() {
		Ok(Invocation::Run(settings)) => settings,
		Ok(Invocation::PrintVersion) => {
			println!("{}", VERSION.as_str());
			return Ok(());
		}
		Err(SettingsError::Cli(err)) => err.exit(),
		Err(err @ SettingsError::MissingElasticsearchUrl) => {
			// tracing wasn't setup yet
			eprintln!("{}", err);
			std::process::exit(2);
		}
		Err(err) => return Err(err).context("failed to load config and command line arguments"),
	};

	log::setup_logging(&settings.log).context("could not setup logging")?;

	tracing::info!("{}", VERSION.as_str());

	// the default registry also carries the process collector
	let registry = prometheus::default_registry().clone();
	let metrics =
		NotificationMetrics::register(&registry).context("failed to register prometheus meters")?;

	let client = elasticsearch::Client::new(
		&settings.elasticsearch,
		VERSION.as_str(),
		Arc::new(EnvCredentials::default()),
	)
	.context("failed to build elasticsearch client")?;

	let receiver = Arc::new(Receiver::new(
		settings.elasticsearch.clone(),
		client,
		Arc::new(SystemClock),
		metrics,
		settings.listener.read_timeout,
	));

	server::run(&settings.listener, server::create_router(receiver, registry)).await
}
