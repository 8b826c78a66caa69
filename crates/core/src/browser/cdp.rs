//! chromiumoxide (CDP) backend for the browser capability seam.

use std::path::Path;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures_util::StreamExt;
use rand::seq::SliceRandom;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{BrowserHandle, BrowserLauncher, PageDriver};
use crate::error::{Error, Result};

/// Desktop user-agent pool. One entry is picked per launch so repeated
/// sessions do not present an identical automation fingerprint to the
/// panel's anti-bot checks.
const USER_AGENTS: &[&str] = &[
	"Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
	"Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
	"Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36",
	"Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:127.0) Gecko/20100101 Firefox/127.0",
	"Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
];

const VIEWPORT_WIDTH: u32 = 1920;
const VIEWPORT_HEIGHT: u32 = 1080;

/// Launches one local Chromium per session.
pub struct CdpLauncher {
	headless: bool,
}

impl CdpLauncher {
	pub fn new(headless: bool) -> Self {
		Self { headless }
	}
}

#[async_trait]
impl BrowserLauncher for CdpLauncher {
	type Handle = CdpSession;

	async fn launch(&self) -> Result<CdpSession> {
		let mut builder = BrowserConfig::builder()
			.window_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
			.arg("--no-sandbox")
			.arg("--disable-setuid-sandbox");
		if !self.headless {
			builder = builder.with_head();
		}
		let config = builder.build().map_err(Error::BrowserLaunch)?;

		let (browser, mut handler) = Browser::launch(config)
			.await
			.map_err(|err| Error::BrowserLaunch(err.to_string()))?;

		// The handler stream must be drained for the browser to function.
		let handler_task = tokio::spawn(async move {
			while let Some(_event) = handler.next().await {}
		});

		let page = browser
			.new_page("about:blank")
			.await
			.map_err(|err| Error::BrowserLaunch(err.to_string()))?;

		let user_agent = USER_AGENTS.choose(&mut rand::thread_rng()).copied().unwrap_or(USER_AGENTS[0]);
		let override_params = SetUserAgentOverrideParams::builder()
			.user_agent(user_agent)
			.build()
			.map_err(Error::BrowserLaunch)?;
		page.execute(override_params)
			.await
			.map_err(|err| Error::BrowserLaunch(err.to_string()))?;

		debug!(target = "aternos", user_agent, headless = self.headless, "browser launched");

		Ok(CdpSession {
			browser,
			page: CdpPage { page },
			handler_task,
		})
	}
}

/// One launched Chromium with its CDP event drain.
pub struct CdpSession {
	browser: Browser,
	page: CdpPage,
	handler_task: JoinHandle<()>,
}

#[async_trait]
impl BrowserHandle for CdpSession {
	fn page(&self) -> &dyn PageDriver {
		&self.page
	}

	async fn close(mut self) -> Result<()> {
		if let Err(err) = self.browser.close().await {
			warn!(target = "aternos", error = %err, "browser close failed");
		}
		let _ = self.browser.wait().await;
		self.handler_task.abort();
		Ok(())
	}
}

/// [`PageDriver`] over a chromiumoxide page.
pub struct CdpPage {
	page: Page,
}

#[async_trait]
impl PageDriver for CdpPage {
	async fn navigate(&self, url: &str) -> Result<()> {
		self.page.goto(url).await.map(|_| ()).map_err(|err| Error::Navigation {
			url: url.to_string(),
			source: anyhow::Error::new(err),
		})
	}

	async fn click(&self, selector: &str) -> Result<()> {
		let element = self.page.find_element(selector).await.map_err(|err| Error::Interaction {
			selector: selector.to_string(),
			reason: err.to_string(),
		})?;
		element.click().await.map(|_| ()).map_err(|err| Error::Interaction {
			selector: selector.to_string(),
			reason: err.to_string(),
		})
	}

	async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
		let element = self.page.find_element(selector).await.map_err(|err| Error::Interaction {
			selector: selector.to_string(),
			reason: err.to_string(),
		})?;
		// Focus before typing, as a user would.
		element.click().await.map_err(|err| Error::Interaction {
			selector: selector.to_string(),
			reason: err.to_string(),
		})?;
		element.type_str(text).await.map(|_| ()).map_err(|err| Error::Interaction {
			selector: selector.to_string(),
			reason: err.to_string(),
		})
	}

	async fn is_visible(&self, selector: &str) -> bool {
		let expr = format!(
			"(() => {{ const e = document.querySelector({sel}); if (!e) return false; \
			 const s = window.getComputedStyle(e); \
			 return s.display !== 'none' && s.visibility !== 'hidden' && s.opacity !== '0'; }})()",
			sel = js_string(selector)
		);
		match self.page.evaluate(expr).await {
			Ok(value) => value.into_value::<bool>().unwrap_or(false),
			Err(_) => false,
		}
	}

	async fn text(&self, selector: &str) -> Option<String> {
		let element = self.page.find_element(selector).await.ok()?;
		let text = element.inner_text().await.ok()??;
		let text = text.trim().to_string();
		(!text.is_empty()).then_some(text)
	}

	async fn texts(&self, selector: &str) -> Vec<String> {
		let expr = format!(
			"Array.from(document.querySelectorAll({})).map(e => e.innerText)",
			js_string(selector)
		);
		match self.page.evaluate(expr).await {
			Ok(value) => value.into_value::<Vec<String>>().unwrap_or_default(),
			Err(_) => Vec::new(),
		}
	}

	async fn attributes(&self, selector: &str, name: &str) -> Vec<String> {
		let expr = format!(
			"Array.from(document.querySelectorAll({sel})).map(e => e.getAttribute({name}) ?? '')",
			sel = js_string(selector),
			name = js_string(name)
		);
		match self.page.evaluate(expr).await {
			Ok(value) => value.into_value::<Vec<String>>().unwrap_or_default(),
			Err(_) => Vec::new(),
		}
	}

	async fn property(&self, selector: &str, name: &str) -> Option<String> {
		let expr = format!(
			"(() => {{ const e = document.querySelector({sel}); \
			 return e && e[{name}] != null ? String(e[{name}]) : null; }})()",
			sel = js_string(selector),
			name = js_string(name)
		);
		let value = self.page.evaluate(expr).await.ok()?;
		value.into_value::<Option<String>>().ok().flatten()
	}

	async fn wait_for_navigation(&self) -> Result<()> {
		if let Err(err) = self.page.wait_for_navigation().await {
			return Err(Error::Navigation {
				url: self.url().await,
				source: anyhow::Error::new(err),
			});
		}
		Ok(())
	}

	async fn url(&self) -> String {
		match self.page.url().await {
			Ok(Some(url)) => url,
			_ => String::new(),
		}
	}

	async fn screenshot(&self, path: &Path) -> Result<()> {
		let params = ScreenshotParams::builder().format(CaptureScreenshotFormat::Png).build();
		let bytes = self.page.screenshot(params).await.map_err(|err| Error::Screenshot {
			path: path.to_path_buf(),
			source: anyhow::Error::new(err),
		})?;
		tokio::fs::write(path, bytes).await?;
		Ok(())
	}
}

/// Embeds a Rust string as a JS string literal, with escaping.
fn js_string(value: &str) -> String {
	serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
	use super::js_string;

	#[test]
	fn js_string_escapes_quotes() {
		assert_eq!(js_string("div.server-body"), "\"div.server-body\"");
		assert_eq!(js_string("a[title=\"x\"]"), "\"a[title=\\\"x\\\"]\"");
	}
}
