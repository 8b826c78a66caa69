//! Status interpreter: page DOM to normalized lifecycle snapshot.
//!
//! Read-only apart from DOM queries, and intentionally unable to fail a
//! session: a cosmetic label change degrades fields to absent instead of
//! erroring.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::browser::PageDriver;
use crate::config::Timeouts;
use crate::error::{Error, Result};
use crate::selectors::SiteSelectors;

/// Normalized lifecycle state of a server.
///
/// Transitions observed on the panel: `Stopped ⇄ Loading -> Running ->
/// Stopped`, `Running -> Loading -> Running` on restart, and `Stopped ->
/// Queued -> Running` when start capacity is constrained. `Unknown` means
/// no recognized indicator rendered and is a dead end for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServerState {
	Stopped,
	Running,
	Queued,
	Loading,
	#[default]
	Unknown,
}

/// Queue snapshot while a start waits for capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueStatus {
	/// Estimated wait in seconds. Malformed time labels degrade to zero.
	pub wait_seconds: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub position: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub waiting_count: Option<u32>,
}

/// Normalized snapshot of the panel's status indicators.
///
/// At most one branch payload is populated, matching `state`:
/// countdown/memory for Running, queue for Queued.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerStatus {
	pub state: ServerState,
	/// Raw status text shown by the panel, best effort.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub countdown: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub memory: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub queue: Option<QueueStatus>,
}

/// Reads the panel's status indicators into a [`ServerStatus`].
///
/// The four icons are probed in fixed priority order so a transitional
/// render state cannot produce a nondeterministic result. The generic
/// status label is raced for separately, bounded by the default timeout.
pub async fn read_status(page: &dyn PageDriver, selectors: &SiteSelectors, timeouts: &Timeouts) -> ServerStatus {
	let mut status = ServerStatus::default();

	if page.is_visible(selectors.icon_stopped).await {
		status.state = ServerState::Stopped;
	} else if page.is_visible(selectors.icon_running).await {
		status.state = ServerState::Running;
		status.countdown = page.text(selectors.status_left).await;
		status.memory = page.text(selectors.status_right).await;
	} else if page.is_visible(selectors.icon_queued).await {
		status.state = ServerState::Queued;
		status.queue = read_queue(page, selectors).await;
	} else if page.is_visible(selectors.icon_loading).await {
		status.state = ServerState::Loading;
	} else {
		status.state = ServerState::Unknown;
	}

	if page.race_selectors(timeouts.default, timeouts.poll, &[selectors.status_label]).await {
		status.label = page.text(selectors.status_label).await;
	}

	debug!(target = "aternos", state = ?status.state, label = ?status.label, "status read");
	status
}

/// Reads and parses the queue labels. Absent labels yield `None`; the
/// queued state itself is still reported.
pub(crate) async fn read_queue(page: &dyn PageDriver, selectors: &SiteSelectors) -> Option<QueueStatus> {
	let time = page.text(selectors.status_left).await?;
	let people = page.text(selectors.status_right).await?;
	Some(parse_queue(&time, &people))
}

/// Parses the queue labels, e.g. time `"ca. 2.5 min"` and people `"3/7"`.
pub fn parse_queue(time: &str, people: &str) -> QueueStatus {
	let wait_seconds = match parse_wait_seconds(time) {
		Ok(seconds) => seconds,
		Err(err) => {
			debug!(target = "aternos", error = %err, "queue time unparseable, assuming zero wait");
			0
		}
	};

	let mut parts = people.split('/');
	let position = parts.next().and_then(parse_count);
	let waiting_count = parts.next().and_then(parse_count);

	QueueStatus {
		wait_seconds,
		position,
		waiting_count,
	}
}

/// Converts the localized duration label to whole seconds. The panel
/// decorates the minute estimate, e.g. `"ca. 2.5 min"`.
fn parse_wait_seconds(label: &str) -> Result<u64> {
	let stripped = label.replace("ca.", "").replace("min", "");
	let minutes: f64 = stripped.trim().parse().map_err(|_| Error::Parse(label.to_string()))?;
	if !minutes.is_finite() || minutes < 0.0 {
		return Err(Error::Parse(label.to_string()));
	}
	Ok((minutes * 60.0).round() as u64)
}

fn parse_count(part: &str) -> Option<u32> {
	part.trim().parse().ok()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::FakePage;

	fn timeouts() -> Timeouts {
		Timeouts::default()
	}

	#[test]
	fn queue_labels_parse_to_seconds_and_positions() {
		let queue = parse_queue("2.5 min", "3/7");
		assert_eq!(queue.wait_seconds, 150);
		assert_eq!(queue.position, Some(3));
		assert_eq!(queue.waiting_count, Some(7));
	}

	#[test]
	fn queue_time_strips_panel_decorations() {
		assert_eq!(parse_queue("ca. 1 min", "1/2").wait_seconds, 60);
		assert_eq!(parse_queue("  0.5 min ", "1/2").wait_seconds, 30);
	}

	#[test]
	fn malformed_queue_labels_degrade_instead_of_failing() {
		let queue = parse_queue("soon™", "lots");
		assert_eq!(queue.wait_seconds, 0);
		assert_eq!(queue.position, None);
		assert_eq!(queue.waiting_count, None);

		let partial = parse_queue("-3 min", "4/");
		assert_eq!(partial.wait_seconds, 0);
		assert_eq!(partial.position, Some(4));
		assert_eq!(partial.waiting_count, None);
	}

	#[tokio::test(start_paused = true)]
	async fn each_icon_maps_to_its_state() {
		let selectors = SiteSelectors::default();
		let cases = [
			(selectors.icon_stopped, ServerState::Stopped),
			(selectors.icon_running, ServerState::Running),
			(selectors.icon_queued, ServerState::Queued),
			(selectors.icon_loading, ServerState::Loading),
		];

		for (icon, expected) in cases {
			let page = FakePage::new();
			page.set_visible(icon, true);
			let status = read_status(&page, &selectors, &timeouts()).await;
			assert_eq!(status.state, expected, "icon {icon}");
			if expected != ServerState::Running {
				assert_eq!(status.countdown, None);
				assert_eq!(status.memory, None);
			}
			if expected != ServerState::Queued {
				assert_eq!(status.queue, None);
			}
		}
	}

	#[tokio::test(start_paused = true)]
	async fn no_icon_yields_unknown() {
		let page = FakePage::new();
		let status = read_status(&page, &SiteSelectors::default(), &timeouts()).await;
		assert_eq!(status.state, ServerState::Unknown);
		assert_eq!(status.label, None);
	}

	#[tokio::test(start_paused = true)]
	async fn running_state_reads_countdown_and_memory() {
		let selectors = SiteSelectors::default();
		let page = FakePage::new();
		page.set_visible(selectors.icon_running, true);
		page.set_text(selectors.status_left, "4:59");
		page.set_text(selectors.status_right, "512MB");

		let status = read_status(&page, &selectors, &timeouts()).await;
		assert_eq!(status.state, ServerState::Running);
		assert_eq!(status.countdown.as_deref(), Some("4:59"));
		assert_eq!(status.memory.as_deref(), Some("512MB"));
		assert_eq!(status.queue, None);
	}

	#[tokio::test(start_paused = true)]
	async fn queued_state_carries_parsed_queue() {
		let selectors = SiteSelectors::default();
		let page = FakePage::new();
		page.set_visible(selectors.icon_queued, true);
		page.set_text(selectors.status_left, "2.5 min");
		page.set_text(selectors.status_right, "3/7");

		let status = read_status(&page, &selectors, &timeouts()).await;
		assert_eq!(status.state, ServerState::Queued);
		let queue = status.queue.expect("queue populated");
		assert_eq!(queue.wait_seconds, 150);
		assert_eq!(queue.position, Some(3));
		assert_eq!(queue.waiting_count, Some(7));
		assert_eq!(status.countdown, None);
	}

	#[tokio::test(start_paused = true)]
	async fn status_label_populates_when_rendered() {
		let selectors = SiteSelectors::default();
		let page = FakePage::new();
		page.set_visible(selectors.icon_stopped, true);
		page.set_visible(selectors.status_label, true);
		page.set_text(selectors.status_label, "Offline");

		let status = read_status(&page, &selectors, &timeouts()).await;
		assert_eq!(status.state, ServerState::Stopped);
		assert_eq!(status.label.as_deref(), Some("Offline"));
	}
}
