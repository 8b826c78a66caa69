//! Per-action choreography over scripted pages: precondition short
//! circuits, confirmation dialogs, queue waits, and postcondition re-reads.

use aternos::testing::{FakeLauncher, FakePage};
use aternos::{AternosClient, Config, Credentials, ServerState, SiteSelectors};

fn config() -> Config {
	Config::new(Credentials {
		username: "steve".into(),
		password: "hunter2".into(),
	})
}

fn panel_page(initial_icon: &str) -> FakePage {
	let sel = SiteSelectors::default();
	let page = FakePage::new();
	page.set_visible(sel.server_list, true);
	page.set_visible(sel.server_card, true);
	page.set_visible(initial_icon, true);
	page.set_text(sel.server_id, "abc123");
	page.set_text(sel.server_name, "skyblock");
	page
}

fn client(page: &FakePage) -> AternosClient<FakeLauncher> {
	AternosClient::with_launcher(config(), FakeLauncher::new(page.clone()))
}

#[tokio::test(start_paused = true)]
async fn start_skips_when_already_running() {
	let sel = SiteSelectors::default();
	let page = panel_page(sel.icon_running);
	page.set_text(sel.status_left, "4:59");
	page.set_text(sel.status_right, "512MB");

	let info = client(&page).start(None, false).await;

	assert_eq!(info.error, None);
	let status = info.status.expect("status captured");
	assert_eq!(status.state, ServerState::Running);
	assert_eq!(status.countdown.as_deref(), Some("4:59"));
	assert_eq!(status.memory.as_deref(), Some("512MB"));
	assert!(!page.clicks().contains(&sel.start_button.to_string()), "clicks: {:?}", page.clicks());
}

#[tokio::test(start_paused = true)]
async fn stop_skips_when_already_stopped() {
	let sel = SiteSelectors::default();
	let page = panel_page(sel.icon_stopped);

	let info = client(&page).stop(None).await;

	assert_eq!(info.error, None);
	assert_eq!(info.status.expect("status captured").state, ServerState::Stopped);
	assert!(!page.clicks().contains(&sel.stop_button.to_string()));
}

#[tokio::test(start_paused = true)]
async fn restart_skips_unless_running() {
	let sel = SiteSelectors::default();
	let page = panel_page(sel.icon_loading);

	let info = client(&page).restart(None).await;

	assert_eq!(info.error, None);
	assert_eq!(info.status.expect("status captured").state, ServerState::Loading);
	assert!(!page.clicks().contains(&sel.restart_button.to_string()));
}

#[tokio::test(start_paused = true)]
async fn start_clicks_through_to_running() {
	let sel = SiteSelectors::default();
	let page = panel_page(sel.icon_stopped);
	page.on_click_set_visible(sel.start_button, sel.icon_stopped, false);
	page.on_click_set_visible(sel.start_button, sel.icon_running, true);
	page.on_click_set_url(sel.start_button, "https://aternos.org/server");

	let info = client(&page).start(None, false).await;

	assert_eq!(info.error, None);
	assert_eq!(info.status.expect("status captured").state, ServerState::Running);
	assert!(page.clicks().contains(&sel.start_button.to_string()));
	// No confirmation dialog was shown, so none was clicked.
	assert!(!page.clicks().contains(&sel.start_confirmation.to_string()));
}

#[tokio::test(start_paused = true)]
async fn start_without_a_dialog_only_waits_the_confirmation_budget() {
	let sel = SiteSelectors::default();
	let page = panel_page(sel.icon_stopped);
	page.on_click_set_visible(sel.start_button, sel.icon_stopped, false);
	page.on_click_set_visible(sel.start_button, sel.icon_running, true);
	page.on_click_set_url(sel.start_button, "https://aternos.org/server");

	let info = client(&page).start(None, false).await;

	assert_eq!(info.error, None);
	// The dialog never appears, so the start pays the short confirmation
	// budget plus the settle pauses, well under the general selector wait.
	assert!(info.elapsed_ms >= 3_000, "elapsed: {}ms", info.elapsed_ms);
	assert!(info.elapsed_ms < 10_000, "elapsed: {}ms", info.elapsed_ms);
}

#[tokio::test(start_paused = true)]
async fn start_clicks_the_confirmation_dialog_when_shown() {
	let sel = SiteSelectors::default();
	let page = panel_page(sel.icon_stopped);
	page.on_click_set_visible(sel.start_button, sel.icon_stopped, false);
	page.on_click_set_visible(sel.start_button, sel.start_confirmation, true);
	page.on_click_set_visible(sel.start_confirmation, sel.start_confirmation, false);
	page.on_click_set_visible(sel.start_confirmation, sel.icon_running, true);
	page.on_click_set_url(sel.start_confirmation, "https://aternos.org/server");

	let info = client(&page).start(None, false).await;

	assert_eq!(info.error, None);
	assert_eq!(info.status.expect("status captured").state, ServerState::Running);
	assert!(page.clicks().contains(&sel.start_confirmation.to_string()));
}

#[tokio::test(start_paused = true)]
async fn start_returns_to_the_server_page_when_navigated_away() {
	let sel = SiteSelectors::default();
	let page = panel_page(sel.icon_stopped);
	page.on_click_set_visible(sel.start_button, sel.icon_stopped, false);
	page.on_click_set_visible(sel.start_button, sel.icon_running, true);
	page.on_click_set_url(sel.start_button, "https://aternos.org/somewhere-else");

	let info = client(&page).start(None, false).await;

	assert_eq!(info.error, None);
	let navigations: Vec<_> = page
		.interactions()
		.into_iter()
		.filter_map(|i| match i {
			aternos::testing::Interaction::Navigate(url) => Some(url),
			_ => None,
		})
		.collect();
	assert!(navigations.contains(&"https://aternos.org/server".to_string()), "navigations: {navigations:?}");
}

#[tokio::test(start_paused = true)]
async fn start_waits_out_the_queue_when_asked() {
	let sel = SiteSelectors::default();
	let page = panel_page(sel.icon_stopped);
	page.set_text(sel.status_left, "ca. 2.5 min");
	page.set_text(sel.status_right, "3/7");
	page.set_visible(sel.queue_confirm, true);
	page.on_click_set_visible(sel.start_button, sel.icon_stopped, false);
	page.on_click_set_visible(sel.start_button, sel.icon_queued, true);
	page.on_click_set_url(sel.start_button, "https://aternos.org/server");
	page.on_click_set_visible(sel.queue_confirm, sel.icon_queued, false);
	page.on_click_set_visible(sel.queue_confirm, sel.icon_running, true);

	let info = client(&page).start(None, true).await;

	assert_eq!(info.error, None);
	assert_eq!(info.status.expect("status captured").state, ServerState::Running);
	assert!(page.clicks().contains(&sel.queue_confirm.to_string()));
}

#[tokio::test(start_paused = true)]
async fn start_without_queue_wait_reports_the_queued_state() {
	let sel = SiteSelectors::default();
	let page = panel_page(sel.icon_stopped);
	page.set_text(sel.status_left, "2.5 min");
	page.set_text(sel.status_right, "3/7");
	page.on_click_set_visible(sel.start_button, sel.icon_stopped, false);
	page.on_click_set_visible(sel.start_button, sel.icon_queued, true);
	page.on_click_set_url(sel.start_button, "https://aternos.org/server");

	let info = client(&page).start(None, false).await;

	assert_eq!(info.error, None);
	let status = info.status.expect("status captured");
	assert_eq!(status.state, ServerState::Queued);
	let queue = status.queue.expect("queue parsed");
	assert_eq!(queue.wait_seconds, 150);
	assert_eq!(queue.position, Some(3));
	assert_eq!(queue.waiting_count, Some(7));
	assert!(!page.clicks().contains(&sel.queue_confirm.to_string()));
}

#[tokio::test(start_paused = true)]
async fn start_timeout_records_error_and_rereads_status() {
	let sel = SiteSelectors::default();
	let page = panel_page(sel.icon_stopped);
	// The stopped icon disappears but no terminal indicator ever shows.
	page.on_click_set_visible(sel.start_button, sel.icon_stopped, false);
	page.on_click_set_url(sel.start_button, "https://aternos.org/server");

	let info = client(&page).start(None, false).await;

	let error = info.error.expect("error recorded");
	assert!(error.contains("timeout"), "error was: {error}");
	// The postcondition re-read still ran and saw no indicator.
	assert_eq!(info.status.expect("status captured").state, ServerState::Unknown);
}

#[tokio::test(start_paused = true)]
async fn stop_clicks_and_waits_for_stopped() {
	let sel = SiteSelectors::default();
	let page = panel_page(sel.icon_running);
	page.on_click_set_visible(sel.stop_button, sel.icon_running, false);
	page.on_click_set_visible(sel.stop_button, sel.icon_stopped, true);

	let info = client(&page).stop(None).await;

	assert_eq!(info.error, None);
	assert_eq!(info.status.expect("status captured").state, ServerState::Stopped);
	assert!(page.clicks().contains(&sel.stop_button.to_string()));
}

#[tokio::test(start_paused = true)]
async fn restart_runs_only_from_running() {
	let sel = SiteSelectors::default();
	let page = panel_page(sel.icon_running);
	page.on_click_set_visible(sel.restart_button, sel.icon_running, true);

	let info = client(&page).restart(None).await;

	assert_eq!(info.error, None);
	assert_eq!(info.status.expect("status captured").state, ServerState::Running);
	assert!(page.clicks().contains(&sel.restart_button.to_string()));
}

#[tokio::test(start_paused = true)]
async fn log_fetch_timeout_is_recorded_but_keeps_baseline_status() {
	let sel = SiteSelectors::default();
	let page = panel_page(sel.icon_stopped);
	// The share panel never becomes visible.

	let info = client(&page).get_info(None).await;

	let error = info.error.expect("error recorded");
	assert!(error.contains(sel.log_output), "error was: {error}");
	assert_eq!(info.log, None);
	assert_eq!(info.status.expect("status captured").state, ServerState::Stopped);
}
