//! basic auth credentials for elasticsearch. They are looked up on every write
//! so rotated credentials get picked up without restarting.
use std::env;

/// environment variable holding the elasticsearch user
pub const USER_ENV_VAR: &str = "ES_USER";
/// environment variable holding the elasticsearch password
pub const PASSWORD_ENV_VAR: &str = "ES_PASS";

#[derive(Clone, PartialEq, Eq)]
/// username and password for http basic auth
pub struct BasicAuth {
	pub username: String,
	pub password: String,
}

impl BasicAuth {
	/// only returns credentials if both parts are non empty
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Option<Self> {
		let (username, password) = (username.into(), password.into());

		if username.is_empty() || password.is_empty() {
			return None;
		}

		Some(Self { username, password })
	}
}

impl std::fmt::Debug for BasicAuth {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BasicAuth")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// queried at write time for the credentials to attach to the request
pub trait CredentialProvider: Send + Sync + std::fmt::Debug {
	fn credentials(&self) -> Option<BasicAuth>;
}

/// reads [USER_ENV_VAR] and [PASSWORD_ENV_VAR] from the process environment
#[derive(Debug, Clone)]
pub struct EnvCredentials {
	user_var: String,
	password_var: String,
}

impl EnvCredentials {
	pub fn new(user_var: impl Into<String>, password_var: impl Into<String>) -> Self {
		Self { user_var: user_var.into(), password_var: password_var.into() }
	}
}

impl Default for EnvCredentials {
	fn default() -> Self {
		Self::new(USER_ENV_VAR, PASSWORD_ENV_VAR)
	}
}

impl CredentialProvider for EnvCredentials {
	fn credentials(&self) -> Option<BasicAuth> {
		let username = env::var(&self.user_var).ok()?;
		let password = env::var(&self.password_var).ok()?;

		BasicAuth::new(username, password)
	}
}

/// credentials fixed at construction
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(pub Option<BasicAuth>);

impl CredentialProvider for StaticCredentials {
	fn credentials(&self) -> Option<BasicAuth> {
		self.0.clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn requires_both_parts() {
		assert!(BasicAuth::new("elastic", "").is_none());
		assert!(BasicAuth::new("", "changeme").is_none());
		assert!(BasicAuth::new("elastic", "changeme").is_some());
	}

	#[test]
	fn env_credentials_are_read_on_every_call() {
		// variable names unique to this test so parallel tests don't interfere
		let provider = EnvCredentials::new("AM2ES_TEST_ROTATE_USER", "AM2ES_TEST_ROTATE_PASS");
		assert_eq!(provider.credentials(), None);

		env::set_var("AM2ES_TEST_ROTATE_USER", "elastic");
		assert_eq!(provider.credentials(), None);

		env::set_var("AM2ES_TEST_ROTATE_PASS", "first");
		assert_eq!(provider.credentials(), BasicAuth::new("elastic", "first"));

		env::set_var("AM2ES_TEST_ROTATE_PASS", "second");
		assert_eq!(provider.credentials(), BasicAuth::new("elastic", "second"));

		env::set_var("AM2ES_TEST_ROTATE_PASS", "");
		assert_eq!(provider.credentials(), None);
	}

	#[test]
	fn debug_hides_password() {
		let auth = BasicAuth::new("elastic", "hunter2").unwrap();

		assert!(!format!("{:?}", auth).contains("hunter2"));
	}
}
