//! Scripted in-process doubles for the browser seam.
//!
//! Tests script visibility and label fixtures up front, optionally attach
//! click-triggered transitions, and assert on the recorded interaction log
//! afterward. [`FakeLauncher`] counts teardowns so tests can prove the
//! browser is released exactly once per session.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::browser::{BrowserHandle, BrowserLauncher, PageDriver};
use crate::error::{Error, Result};

/// One recorded page interaction, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
	Navigate(String),
	Click(String),
	Type(String, String),
	WaitForNavigation,
	Screenshot,
}

#[derive(Default)]
struct FakeState {
	visible: HashSet<String>,
	texts: HashMap<String, String>,
	all_texts: HashMap<String, Vec<String>>,
	all_attributes: HashMap<(String, String), Vec<String>>,
	properties: HashMap<(String, String), String>,
	url: String,
	interactions: Vec<Interaction>,
	fail_clicks: HashSet<String>,
	click_visibility: HashMap<String, Vec<(String, bool)>>,
	click_urls: HashMap<String, String>,
}

/// Scripted page double. Cloning shares state, so a test can keep a handle
/// for assertions while the driver owns another.
#[derive(Clone, Default)]
pub struct FakePage {
	state: Arc<Mutex<FakeState>>,
}

impl FakePage {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set_visible(&self, selector: &str, visible: bool) {
		let mut state = self.lock();
		if visible {
			state.visible.insert(selector.to_string());
		} else {
			state.visible.remove(selector);
		}
	}

	pub fn set_text(&self, selector: &str, text: &str) {
		self.lock().texts.insert(selector.to_string(), text.to_string());
	}

	pub fn set_texts(&self, selector: &str, texts: &[&str]) {
		self.lock().all_texts.insert(selector.to_string(), texts.iter().map(|t| t.to_string()).collect());
	}

	pub fn set_attributes(&self, selector: &str, name: &str, values: &[&str]) {
		self.lock()
			.all_attributes
			.insert((selector.to_string(), name.to_string()), values.iter().map(|v| v.to_string()).collect());
	}

	pub fn set_property(&self, selector: &str, name: &str, value: &str) {
		self.lock().properties.insert((selector.to_string(), name.to_string()), value.to_string());
	}

	pub fn set_url(&self, url: &str) {
		self.lock().url = url.to_string();
	}

	/// Scripts the named click to fail with an interaction error.
	pub fn fail_click(&self, selector: &str) {
		self.lock().fail_clicks.insert(selector.to_string());
	}

	/// Scripts visibility changes applied when `click_selector` is clicked,
	/// to model panel state transitions.
	pub fn on_click_set_visible(&self, click_selector: &str, target: &str, visible: bool) {
		self.lock()
			.click_visibility
			.entry(click_selector.to_string())
			.or_default()
			.push((target.to_string(), visible));
	}

	/// Scripts a URL change applied when `click_selector` is clicked.
	pub fn on_click_set_url(&self, click_selector: &str, url: &str) {
		self.lock().click_urls.insert(click_selector.to_string(), url.to_string());
	}

	pub fn interactions(&self) -> Vec<Interaction> {
		self.lock().interactions.clone()
	}

	/// Clicked selectors, in order.
	pub fn clicks(&self) -> Vec<String> {
		self.lock()
			.interactions
			.iter()
			.filter_map(|i| match i {
				Interaction::Click(selector) => Some(selector.clone()),
				_ => None,
			})
			.collect()
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
		self.state.lock().expect("fake page state poisoned")
	}
}

#[async_trait]
impl PageDriver for FakePage {
	async fn navigate(&self, url: &str) -> Result<()> {
		let mut state = self.lock();
		state.url = url.to_string();
		state.interactions.push(Interaction::Navigate(url.to_string()));
		Ok(())
	}

	async fn click(&self, selector: &str) -> Result<()> {
		let mut state = self.lock();
		if state.fail_clicks.contains(selector) {
			return Err(Error::Interaction {
				selector: selector.to_string(),
				reason: "scripted click failure".into(),
			});
		}
		state.interactions.push(Interaction::Click(selector.to_string()));
		if let Some(changes) = state.click_visibility.get(selector).cloned() {
			for (target, visible) in changes {
				if visible {
					state.visible.insert(target);
				} else {
					state.visible.remove(&target);
				}
			}
		}
		if let Some(url) = state.click_urls.get(selector).cloned() {
			state.url = url;
		}
		Ok(())
	}

	async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
		self.lock().interactions.push(Interaction::Type(selector.to_string(), text.to_string()));
		Ok(())
	}

	async fn is_visible(&self, selector: &str) -> bool {
		self.lock().visible.contains(selector)
	}

	async fn text(&self, selector: &str) -> Option<String> {
		self.lock().texts.get(selector).cloned().filter(|t| !t.trim().is_empty())
	}

	async fn texts(&self, selector: &str) -> Vec<String> {
		let state = self.lock();
		match state.all_texts.get(selector) {
			Some(texts) => texts.clone(),
			None => state.texts.get(selector).map(|t| vec![t.clone()]).unwrap_or_default(),
		}
	}

	async fn attributes(&self, selector: &str, name: &str) -> Vec<String> {
		self.lock()
			.all_attributes
			.get(&(selector.to_string(), name.to_string()))
			.cloned()
			.unwrap_or_default()
	}

	async fn property(&self, selector: &str, name: &str) -> Option<String> {
		self.lock().properties.get(&(selector.to_string(), name.to_string())).cloned()
	}

	async fn wait_for_navigation(&self) -> Result<()> {
		self.lock().interactions.push(Interaction::WaitForNavigation);
		Ok(())
	}

	async fn url(&self) -> String {
		self.lock().url.clone()
	}

	async fn screenshot(&self, _path: &Path) -> Result<()> {
		self.lock().interactions.push(Interaction::Screenshot);
		Ok(())
	}
}

/// Launcher double handing out one scripted page and counting teardowns.
/// Clones share the close counter.
#[derive(Clone)]
pub struct FakeLauncher {
	page: FakePage,
	closes: Arc<AtomicUsize>,
	fail_launch: bool,
}

impl FakeLauncher {
	pub fn new(page: FakePage) -> Self {
		Self {
			page,
			closes: Arc::new(AtomicUsize::new(0)),
			fail_launch: false,
		}
	}

	/// Launcher whose launch always fails, for launch-path tests.
	pub fn failing() -> Self {
		Self {
			page: FakePage::new(),
			closes: Arc::new(AtomicUsize::new(0)),
			fail_launch: true,
		}
	}

	/// Number of times a handle from this launcher was closed.
	pub fn close_count(&self) -> usize {
		self.closes.load(Ordering::SeqCst)
	}
}

pub struct FakeHandle {
	page: FakePage,
	closes: Arc<AtomicUsize>,
}

#[async_trait]
impl BrowserHandle for FakeHandle {
	fn page(&self) -> &dyn PageDriver {
		&self.page
	}

	async fn close(self) -> Result<()> {
		self.closes.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
	type Handle = FakeHandle;

	async fn launch(&self) -> Result<FakeHandle> {
		if self.fail_launch {
			return Err(Error::BrowserLaunch("scripted launch failure".into()));
		}
		Ok(FakeHandle {
			page: self.page.clone(),
			closes: Arc::clone(&self.closes),
		})
	}
}
