//! configuration from defaults, an optional config file, environment variables
//! and command line flags, in increasing order of precedence
use std::ffi::OsString;

use clap::{crate_description, crate_name, Arg, Command};
use config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;

use crate::{
	elasticsearch::{self, ElasticsearchSettings},
	log::LogSettings,
	server::ListenerSettings,
};

/// prefix of environment variables overriding config keys, e.g.
/// `ALERTMANAGER2ES__ELASTICSEARCH__URL`
pub const ENV_PREFIX: &str = "ALERTMANAGER2ES";

/// command line flags and the config keys they override
const CLI_OVERRIDES: &[(&str, &str)] = &[
	("level", "log.level"),
	("addr", "listener.address"),
	("es_url", "elasticsearch.url"),
	("es_index_name", "elasticsearch.index_name"),
	("es_index_date_format", "elasticsearch.index_date_format"),
	("es_type", "elasticsearch.doc_type"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
	pub log: LogSettings,
	pub listener: ListenerSettings,
	pub elasticsearch: ElasticsearchSettings,
}

#[derive(Debug)]
/// what the command line asked us to do
pub enum Invocation {
	Run(Settings),
	PrintVersion,
}

#[derive(Error, Debug)]
pub enum SettingsError {
	#[error(transparent)]
	Cli(#[from] clap::Error),
	#[error("Must specify HTTP URL for Elasticsearch (--esURL)")]
	MissingElasticsearchUrl,
	#[error("invalid Elasticsearch index date format {0:?}")]
	InvalidIndexDateFormat(String),
	#[error("can't load config: {0}")]
	Config(#[from] config::ConfigError),
}

fn command() -> Command<'static> {
	Command::new(crate_name!()).about(crate_description!()).args(&[
		Arg::new("config")
			.help("path of config file")
			.takes_value(true)
			.short('c')
			.long("config"),
		Arg::new("level")
			.help("log level")
			.possible_values(["error", "warn", "info", "debug", "trace"])
			.ignore_case(true)
			.takes_value(true)
			.long("log"),
		Arg::new("addr").help("host:port to listen to").takes_value(true).long("addr"),
		Arg::new("es_url").help("Elasticsearch HTTP URL").takes_value(true).long("esURL"),
		Arg::new("es_index_name")
			.help("Elasticsearch index name")
			.takes_value(true)
			.long("esIndexName"),
		Arg::new("es_index_date_format")
			.help("Elasticsearch index date format (strftime)")
			.takes_value(true)
			.long("esIndexDateFormat"),
		Arg::new("es_type")
			.help("Elasticsearch document type ('_type')")
			.takes_value(true)
			.long("esType"),
		Arg::new("version").help("Print version number and exit").short('V').long("version"),
	])
}

impl Settings {
	/// load settings for the command line this process was started with
	pub fn load() -> Result<Invocation, SettingsError> {
		Self::load_from(std::env::args_os())
	}

	pub fn load_from<I, T>(args: I) -> Result<Invocation, SettingsError>
	where
		I: IntoIterator<Item = T>,
		T: Into<OsString> + Clone,
	{
		let opts = command().try_get_matches_from(args)?;

		if opts.is_present("version") {
			return Ok(Invocation::PrintVersion);
		}

		let mut builder = Config::builder()
			.set_default("log.level", "info")?
			.set_default("listener.address", "localhost:9097")?
			.set_default("listener.read_timeout", 10.0)?
			.set_default("elasticsearch.index_name", "alertmanager")?
			// monthly indices, we don't produce enough data to warrant daily ones
			.set_default("elasticsearch.index_date_format", "%Y.%m")?
			.set_default("elasticsearch.doc_type", "alert_group")?
			.set_default("elasticsearch.timeout", 10.0)?;

		if let Some(config_path) = opts.value_of("config") {
			builder = builder.add_source(config::File::with_name(config_path));
		}

		builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

		for (arg, key) in CLI_OVERRIDES {
			if let Some(value) = opts.value_of(*arg) {
				builder = builder.set_override(*key, value)?;
			}
		}

		let conf = builder.build()?;

		match conf.get_string("elasticsearch.url") {
			Ok(url) if !url.is_empty() => {}
			_ => return Err(SettingsError::MissingElasticsearchUrl),
		}

		let settings: Settings = conf.try_deserialize()?;

		let date_format = &settings.elasticsearch.index_date_format;
		if !elasticsearch::is_valid_date_format(date_format) {
			return Err(SettingsError::InvalidIndexDateFormat(date_format.clone()));
		}

		Ok(Invocation::Run(settings))
	}
}
