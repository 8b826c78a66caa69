use serde::{Deserialize, Serialize};

use crate::status::ServerStatus;

/// Player occupancy, parsed from the panel's `current/max` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Players {
	pub current: u32,
	pub max: u32,
}

impl Players {
	/// Parses a `"3/20"` style label. Malformed labels yield `None`.
	pub(crate) fn parse(label: &str) -> Option<Self> {
		let (current, max) = label.split_once('/')?;
		Some(Self {
			current: current.trim().parse().ok()?,
			max: max.trim().parse().ok()?,
		})
	}
}

/// Best-effort result of one full session.
///
/// `error` and the data fields are mutually informative: a failed session
/// still carries whatever was read before the failure, so consumers must
/// check `error` before trusting the rest. `elapsed_ms` is stamped on
/// every path, including failures.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerInfo {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<ServerStatus>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub players: Option<Players>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub software: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	/// Shared server log, present only after a log fetch.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub log: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	/// Wall-clock duration of the whole session.
	pub elapsed_ms: u64,
}

impl ServerInfo {
	pub(crate) fn record_error(&mut self, err: &impl std::fmt::Display) {
		self.error = Some(err.to_string());
	}
}
