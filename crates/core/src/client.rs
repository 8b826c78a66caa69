//! Facade: the four lifecycle operations exposed to callers.

use crate::actions;
use crate::browser::BrowserLauncher;
use crate::browser::cdp::CdpLauncher;
use crate::config::{Config, SERVER_DOMAIN};
use crate::info::ServerInfo;
use crate::selectors::SiteSelectors;
use crate::session::{SessionContext, SessionManager};

/// Client over the hosting panel.
///
/// Each operation runs one isolated session end to end and never errors;
/// consult [`ServerInfo::error`] on the result. `server` identifies the
/// target by id or exact display name; `None` selects the first listed
/// server.
pub struct AternosClient<L: BrowserLauncher = CdpLauncher> {
	sessions: SessionManager<L>,
}

impl AternosClient<CdpLauncher> {
	/// Client backed by a locally launched Chromium.
	pub fn new(config: Config) -> Self {
		let launcher = CdpLauncher::new(config.headless);
		Self::with_launcher(config, launcher)
	}
}

impl<L: BrowserLauncher> AternosClient<L> {
	/// Client over an explicit launcher, for alternate backends and tests.
	pub fn with_launcher(config: Config, launcher: L) -> Self {
		Self {
			sessions: SessionManager::new(launcher, config, SiteSelectors::default()),
		}
	}

	/// Starts the server, optionally holding the session open through a
	/// start queue.
	pub async fn start(&self, server: Option<&str>, wait_in_queue: bool) -> ServerInfo {
		self.sessions
			.run_session(server, move |ctx: SessionContext<'_>, info| {
				Box::pin(async move { actions::start(ctx, info, wait_in_queue).await })
			})
			.await
	}

	pub async fn stop(&self, server: Option<&str>) -> ServerInfo {
		self.sessions
			.run_session(server, |ctx: SessionContext<'_>, info| {
				Box::pin(async move { actions::stop(ctx, info).await })
			})
			.await
	}

	pub async fn restart(&self, server: Option<&str>) -> ServerInfo {
		self.sessions
			.run_session(server, |ctx: SessionContext<'_>, info| {
				Box::pin(async move { actions::restart(ctx, info).await })
			})
			.await
	}

	/// Reads full server information, including the shared log.
	pub async fn get_info(&self, server: Option<&str>) -> ServerInfo {
		self.sessions
			.run_session(server, |ctx: SessionContext<'_>, info| {
				Box::pin(async move { actions::fetch_log(ctx, info).await })
			})
			.await
	}

	/// Public hostname of the server, derived from its panel name. Absent
	/// when the session could not read a name.
	pub async fn hostname(&self, server: Option<&str>) -> Option<String> {
		let info = self.get_info(server).await;
		info.name.map(|name| format!("{name}.{SERVER_DOMAIN}"))
	}
}
