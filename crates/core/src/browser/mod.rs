//! Narrow browser capability seam.
//!
//! The driver depends on these traits rather than on a concrete automation
//! library, so tests substitute a scripted page (see [`crate::testing`])
//! and the real backend stays swappable. [`cdp`] provides the chromiumoxide
//! implementation used in production.

pub mod cdp;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::{Error, Result};

/// Query and interaction primitives over one live page.
///
/// All read methods are best effort: an absent element is `None`/`false`,
/// never an error. Only interactions and navigation can fail.
#[async_trait]
pub trait PageDriver: Send + Sync {
	async fn navigate(&self, url: &str) -> Result<()>;

	async fn click(&self, selector: &str) -> Result<()>;

	async fn type_text(&self, selector: &str, text: &str) -> Result<()>;

	/// Computed-style visibility test. Absent elements are not visible.
	async fn is_visible(&self, selector: &str) -> bool;

	/// Trimmed inner text of the first match, when non-empty.
	async fn text(&self, selector: &str) -> Option<String>;

	/// Inner text of every match, in document order.
	async fn texts(&self, selector: &str) -> Vec<String>;

	/// A named attribute of every match, in document order. Elements without
	/// the attribute contribute an empty string.
	async fn attributes(&self, selector: &str, name: &str) -> Vec<String>;

	/// A named DOM property of the first match, rendered as a string.
	async fn property(&self, selector: &str, name: &str) -> Option<String>;

	/// Resolves once an in-flight navigation finishes loading.
	async fn wait_for_navigation(&self) -> Result<()>;

	async fn url(&self) -> String;

	async fn screenshot(&self, path: &Path) -> Result<()>;

	/// Polls until `selector` is visible, bounded by `timeout`.
	async fn wait_for_selector(&self, selector: &str, timeout: Duration, poll: Duration) -> Result<()> {
		let deadline = Instant::now() + timeout;
		loop {
			if self.is_visible(selector).await {
				return Ok(());
			}
			if Instant::now() >= deadline {
				return Err(Error::Timeout {
					ms: timeout.as_millis() as u64,
					condition: selector.to_string(),
				});
			}
			tokio::time::sleep(poll).await;
		}
	}

	/// Polls until any of `selectors` is visible. Returns `false` on
	/// timeout instead of erroring; callers that need a hard failure use
	/// [`PageDriver::wait_for_selector`].
	async fn race_selectors(&self, timeout: Duration, poll: Duration, selectors: &[&str]) -> bool {
		let deadline = Instant::now() + timeout;
		loop {
			for selector in selectors {
				if self.is_visible(selector).await {
					return true;
				}
			}
			if Instant::now() >= deadline {
				return false;
			}
			tokio::time::sleep(poll).await;
		}
	}
}

/// One launched, exclusively owned browser.
#[async_trait]
pub trait BrowserHandle: Send {
	fn page(&self) -> &dyn PageDriver;

	/// Releases the browser process. Called exactly once per session, on
	/// every exit path.
	async fn close(self) -> Result<()>;
}

/// Launches one isolated browser per session.
///
/// No pooling or reuse: a wedged page must not be able to corrupt a later
/// call, at the cost of per-call startup latency.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
	type Handle: BrowserHandle;

	async fn launch(&self) -> Result<Self::Handle>;
}
