use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for the panel driver.
///
/// Nothing here escapes the facade: the session manager and action driver
/// fold failures into [`ServerInfo::error`](crate::info::ServerInfo) before
/// returning to the caller.
#[derive(Debug, Error)]
pub enum Error {
	/// The panel rejected the configured credentials. Carries the panel's
	/// own error text.
	#[error("authentication rejected: {0}")]
	Authentication(String),

	/// No listed server matched the requested identifier.
	#[error("server not found: {0}")]
	ServerNotFound(String),

	#[error("timeout after {ms}ms waiting for: {condition}")]
	Timeout { ms: u64, condition: String },

	/// A required control was absent or refused the interaction.
	#[error("interaction failed on {selector}: {reason}")]
	Interaction { selector: String, reason: String },

	/// A label could not be converted to its structured field. The status
	/// interpreter downgrades this to an absent/zero field; it never
	/// crosses a session boundary.
	#[error("unparseable label: {0:?}")]
	Parse(String),

	#[error("browser launch failed: {0}")]
	BrowserLaunch(String),

	#[error("navigation failed: {url}")]
	Navigation {
		url: String,
		#[source]
		source: anyhow::Error,
	},

	#[error("screenshot failed: {path}")]
	Screenshot {
		path: PathBuf,
		#[source]
		source: anyhow::Error,
	},

	#[error("configuration error: {0}")]
	Config(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}
