use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
	extract::Extension,
	routing::{get, post},
	Router,
};
use prometheus::Registry;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};

use crate::{
	telemetry_endpoint::{metrics_handler, version_handler},
	webhook::{webhook_handler, Receiver},
};

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct ListenerSettings {
	/// `host:port` to listen on
	pub address: String,
	/// how long we wait for a request body
	#[serde_as(as = "DurationSeconds<f64>")]
	pub read_timeout: Duration,
}

impl ListenerSettings {
	pub async fn to_socket_addr(&self) -> Result<SocketAddr> {
		tokio::net::lookup_host(self.address.as_str())
			.await
			.with_context(|| format!("failed to resolve listen address {}", self.address))?
			.next()
			.with_context(|| format!("listen address {} resolved to nothing", self.address))
	}
}

pub fn create_router(receiver: Arc<Receiver>, registry: Registry) -> Router {
	Router::new()
		.route("/", get(version_handler))
		.route("/metrics", get(metrics_handler))
		.route("/webhook", post(webhook_handler))
		.layer(Extension(receiver))
		.layer(Extension(registry))
}

pub async fn run(settings: &ListenerSettings, app: Router) -> Result<()> {
	let addr = settings.to_socket_addr().await?;

	let server = axum::Server::try_bind(&addr).with_context(|| format!("failed to bind {}", addr))?;

	tracing::info!("Listening on {}", addr);

	server.serve(app.into_make_service()).await.context("webhook receiver crashed")?;

	Ok(())
}
