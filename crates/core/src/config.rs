use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default panel entry point.
pub const DEFAULT_HOSTNAME: &str = "https://aternos.org";

/// Domain under which started servers are reachable.
pub const SERVER_DOMAIN: &str = "aternos.me";

const ENV_USER: &str = "ATERNOS_USER";
const ENV_PASSWORD: &str = "ATERNOS_PASSWORD";

/// Login credentials for the panel account.
#[derive(Debug, Clone)]
pub struct Credentials {
	pub username: String,
	pub password: String,
}

/// Bounds for every suspension point in a session. A timed-out wait aborts
/// the remaining action steps but never skips teardown.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
	/// Ordinary selector and login waits.
	pub default: Duration,
	/// A start or restart reaching Running (or Queued).
	pub start: Duration,
	/// A stop reaching Stopped.
	pub stop: Duration,
	/// The optional post-start confirmation dialog appearing. Short: the
	/// dialog renders promptly when the panel shows it at all, and every
	/// plain start pays this wait in full.
	pub confirm: Duration,
	/// Settle pause after a click. The panel's transitions are not all
	/// observable as events, so actions pause briefly and re-read; callers
	/// must treat subsequent reads as best effort. Tests zero this out.
	pub settle: Duration,
	/// Polling cadence for visibility-based waits.
	pub poll: Duration,
}

impl Default for Timeouts {
	fn default() -> Self {
		Self {
			default: Duration::from_secs(10),
			start: Duration::from_secs(300),
			stop: Duration::from_secs(60),
			confirm: Duration::from_secs(3),
			settle: Duration::from_secs(1),
			poll: Duration::from_millis(250),
		}
	}
}

/// Fully owned driver configuration.
///
/// Credentials are validated at construction, not at first use inside a
/// live session.
#[derive(Debug, Clone)]
pub struct Config {
	/// Panel origin, without a trailing slash.
	pub hostname: String,
	pub credentials: Credentials,
	pub timeouts: Timeouts,
	/// Whether the browser launches headless.
	pub headless: bool,
	/// When set, a screenshot of the login page is written here as a
	/// debugging aid.
	pub screenshot: Option<PathBuf>,
}

impl Config {
	pub fn new(credentials: Credentials) -> Self {
		Self {
			hostname: DEFAULT_HOSTNAME.to_string(),
			credentials,
			timeouts: Timeouts::default(),
			headless: true,
			screenshot: None,
		}
	}

	/// Builds a config from `ATERNOS_USER` / `ATERNOS_PASSWORD`. Missing or
	/// blank values fail here rather than mid-session.
	pub fn from_env() -> Result<Self> {
		let username = require_env(ENV_USER)?;
		let password = require_env(ENV_PASSWORD)?;
		Ok(Self::new(Credentials { username, password }))
	}

	pub(crate) fn login_url(&self) -> String {
		format!("{}/go", self.hostname)
	}

	pub(crate) fn server_url(&self) -> String {
		format!("{}/server", self.hostname)
	}

	pub(crate) fn log_url(&self) -> String {
		format!("{}/log", self.hostname)
	}
}

fn require_env(key: &str) -> Result<String> {
	match env::var(key) {
		Ok(value) if !value.trim().is_empty() => Ok(value),
		_ => Err(Error::Config(format!("missing environment variable: {key}"))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config() -> Config {
		Config::new(Credentials {
			username: "steve".into(),
			password: "hunter2".into(),
		})
	}

	#[test]
	fn urls_derive_from_hostname() {
		let mut cfg = config();
		cfg.hostname = "https://panel.example".into();
		assert_eq!(cfg.login_url(), "https://panel.example/go");
		assert_eq!(cfg.server_url(), "https://panel.example/server");
		assert_eq!(cfg.log_url(), "https://panel.example/log");
	}

	#[test]
	fn require_env_rejects_missing_variable() {
		let err = require_env("ATERNOS_DEFINITELY_UNSET").unwrap_err();
		assert!(err.to_string().contains("ATERNOS_DEFINITELY_UNSET"));
	}

	#[test]
	fn defaults_match_panel_policy() {
		let cfg = config();
		assert_eq!(cfg.hostname, DEFAULT_HOSTNAME);
		assert!(cfg.headless);
		assert_eq!(cfg.timeouts.default, Duration::from_secs(10));
		assert_eq!(cfg.timeouts.start, Duration::from_secs(300));
		assert_eq!(cfg.timeouts.stop, Duration::from_secs(60));
		assert_eq!(cfg.timeouts.confirm, Duration::from_secs(3));
	}
}
