//! Session manager: login, server selection, guaranteed teardown.
//!
//! Centralizing login/selection/teardown here removes duplication across
//! the lifecycle actions and guarantees symmetric resource cleanup; an
//! unreleased browser is a leak that compounds across repeated calls.

use std::future::Future;
use std::pin::Pin;

use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::browser::{BrowserHandle, BrowserLauncher, PageDriver};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::info::{Players, ServerInfo};
use crate::selectors::SiteSelectors;
use crate::status;

/// Boxed action future borrowing the session context and in-progress info.
pub type ActionFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Page plus configuration, handed to the action callback once the server
/// detail page is reached.
#[derive(Clone, Copy)]
pub struct SessionContext<'a> {
	pub page: &'a dyn PageDriver,
	pub config: &'a Config,
	pub selectors: &'a SiteSelectors,
}

/// Drives one panel session per call. Owns nothing between calls; every
/// invocation launches and releases its own isolated browser.
pub struct SessionManager<L: BrowserLauncher> {
	launcher: L,
	config: Config,
	selectors: SiteSelectors,
}

impl<L: BrowserLauncher> SessionManager<L> {
	pub fn new(launcher: L, config: Config, selectors: SiteSelectors) -> Self {
		Self {
			launcher,
			config,
			selectors,
		}
	}

	/// Runs one end-to-end session and hands the page to `action` once the
	/// server detail page is reached and baseline info is captured.
	///
	/// Never returns an error: failures at any step are recorded on the
	/// returned info, the browser is released on every path, and
	/// `elapsed_ms` is stamped last.
	pub async fn run_session<F>(&self, server_id: Option<&str>, action: F) -> ServerInfo
	where
		F: for<'a> FnOnce(SessionContext<'a>, &'a mut ServerInfo) -> ActionFuture<'a> + Send,
	{
		let started = Instant::now();
		let mut info = ServerInfo::default();

		match self.launcher.launch().await {
			Ok(handle) => {
				if let Err(err) = self.drive(handle.page(), server_id, &mut info, action).await {
					warn!(target = "aternos", error = %err, "session failed");
					info.record_error(&err);
				}
				if let Err(err) = handle.close().await {
					warn!(target = "aternos", error = %err, "browser teardown failed");
				}
			}
			Err(err) => {
				warn!(target = "aternos", error = %err, "browser launch failed");
				info.record_error(&err);
			}
		}

		info.elapsed_ms = started.elapsed().as_millis() as u64;
		info
	}

	async fn drive<F>(&self, page: &dyn PageDriver, server_id: Option<&str>, info: &mut ServerInfo, action: F) -> Result<()>
	where
		F: for<'a> FnOnce(SessionContext<'a>, &'a mut ServerInfo) -> ActionFuture<'a> + Send,
	{
		self.login(page).await?;
		let card = self.resolve_server(page, server_id).await?;
		self.open_server(page, &card).await?;
		self.capture_baseline(page, info).await;

		let ctx = SessionContext {
			page,
			config: &self.config,
			selectors: &self.selectors,
		};
		action(ctx, info).await;
		Ok(())
	}

	async fn login(&self, page: &dyn PageDriver) -> Result<()> {
		let timeouts = &self.config.timeouts;
		page.navigate(&self.config.login_url()).await?;

		if let Some(path) = &self.config.screenshot {
			if let Err(err) = page.screenshot(path).await {
				debug!(target = "aternos", error = %err, "login screenshot failed");
			}
		}

		page.type_text(self.selectors.login_user, &self.config.credentials.username).await?;
		page.type_text(self.selectors.login_password, &self.config.credentials.password).await?;
		page.click(self.selectors.login_submit).await?;

		// Whichever the panel renders first: a populated login error or the
		// server list.
		let deadline = Instant::now() + timeouts.default;
		loop {
			if let Some(message) = page.text(self.selectors.login_error).await {
				return Err(Error::Authentication(message));
			}
			if page.is_visible(self.selectors.server_list).await {
				debug!(target = "aternos", "login accepted");
				return Ok(());
			}
			if Instant::now() >= deadline {
				return Err(Error::Timeout {
					ms: timeouts.default.as_millis() as u64,
					condition: format!("{} or {}", self.selectors.login_error, self.selectors.server_list),
				});
			}
			sleep(timeouts.poll).await;
		}
	}

	/// Resolves the card selector for the requested server. A `data-id`
	/// attribute match wins; otherwise the listed names are scanned for an
	/// exact match. With no identifier the first card is used.
	async fn resolve_server(&self, page: &dyn PageDriver, server_id: Option<&str>) -> Result<String> {
		let Some(id) = server_id else {
			if page.is_visible(self.selectors.server_card).await {
				return Ok(self.selectors.server_card.to_string());
			}
			return Err(Error::ServerNotFound("<first listed>".into()));
		};

		let by_id = self.selectors.server_card_by_id(id);
		if page.is_visible(&by_id).await {
			return Ok(by_id);
		}

		// Positional selectors miscount when the list holds unrelated
		// siblings, so the matched card is addressed by its own id attribute.
		let names = page.texts(self.selectors.server_card_name).await;
		if let Some(index) = names.iter().position(|name| name.trim() == id) {
			let ids = page.attributes(self.selectors.server_card, "data-id").await;
			if let Some(card_id) = ids.get(index).filter(|v| !v.is_empty()) {
				return Ok(self.selectors.server_card_by_id(card_id));
			}
		}

		Err(Error::ServerNotFound(id.to_string()))
	}

	async fn open_server(&self, page: &dyn PageDriver, card: &str) -> Result<()> {
		// The click can trigger navigation synchronously in the engine, so
		// both futures must be in flight together.
		let (nav, click) = tokio::join!(page.wait_for_navigation(), page.click(card));
		click?;
		nav?;

		if page.is_visible(self.selectors.consent_accept).await {
			if let Err(err) = page.click(self.selectors.consent_accept).await {
				debug!(target = "aternos", error = %err, "consent dismissal failed");
			}
		}
		Ok(())
	}

	/// Baseline read after reaching the server detail page. Individual
	/// readers are best effort.
	async fn capture_baseline(&self, page: &dyn PageDriver, info: &mut ServerInfo) {
		info.id = page.text(self.selectors.server_id).await;
		info.name = page.text(self.selectors.server_name).await;
		info.status = Some(status::read_status(page, &self.selectors, &self.config.timeouts).await);
		info.players = match page.text(self.selectors.players).await {
			Some(label) => Players::parse(&label),
			None => None,
		};
		info.software = page.text(self.selectors.software).await;
		info.version = page.text(self.selectors.version).await;

		info!(
			target = "aternos",
			id = ?info.id,
			name = ?info.name,
			state = ?info.status.as_ref().map(|s| s.state),
			"baseline captured"
		);
	}
}
