//! Action driver: per-action UI choreography and timeout policy.
//!
//! Every action checks a precondition against the baseline status, runs
//! its click/wait sequence, and re-reads status afterward. Failures are
//! recorded on the info object and never escape; the status re-read still
//! runs so the caller sees where the panel actually ended up.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::info::ServerInfo;
use crate::session::SessionContext;
use crate::status::{self, ServerState};

/// Settle pause after a click; see [`crate::config::Timeouts::settle`].
async fn settle(ctx: SessionContext<'_>) {
	sleep(ctx.config.timeouts.settle).await;
}

async fn reread_status(ctx: SessionContext<'_>, info: &mut ServerInfo) {
	info.status = Some(status::read_status(ctx.page, ctx.selectors, &ctx.config.timeouts).await);
}

fn baseline_state(info: &ServerInfo) -> ServerState {
	info.status.as_ref().map(|s| s.state).unwrap_or_default()
}

/// Starts the server. Skipped when the baseline state is not Stopped, in
/// which case the baseline status is returned untouched.
pub(crate) async fn start(ctx: SessionContext<'_>, info: &mut ServerInfo, wait_in_queue: bool) {
	if baseline_state(info) != ServerState::Stopped {
		debug!(target = "aternos", "start skipped, server is not stopped");
		return;
	}

	if let Err(err) = run_start(ctx, wait_in_queue).await {
		warn!(target = "aternos", error = %err, "start failed");
		info.record_error(&err);
	}
	reread_status(ctx, info).await;
}

async fn run_start(ctx: SessionContext<'_>, wait_in_queue: bool) -> Result<()> {
	let page = ctx.page;
	let sel = ctx.selectors;
	let to = &ctx.config.timeouts;

	page.click(sel.start_button).await?;
	settle(ctx).await;

	// A confirmation dialog is not always shown; its absence is not an
	// error.
	if page.race_selectors(to.confirm, to.poll, &[sel.start_confirmation]).await {
		page.click(sel.start_confirmation).await?;
		settle(ctx).await;
	}

	// Some confirmations navigate away from the server context entirely.
	if !page.url().await.contains("server") {
		page.navigate(&ctx.config.server_url()).await?;
	}

	if !page.race_selectors(to.start, to.poll, &[sel.icon_running, sel.icon_queued]).await {
		return Err(Error::Timeout {
			ms: to.start.as_millis() as u64,
			condition: "running or queued indicator".into(),
		});
	}
	settle(ctx).await;

	if wait_in_queue && page.is_visible(sel.icon_queued).await {
		wait_out_queue(ctx).await?;
	}

	Ok(())
}

/// Holds the session open for the queue's own reported wait time, confirms
/// the slot when offered, then waits for Running.
async fn wait_out_queue(ctx: SessionContext<'_>) -> Result<()> {
	let page = ctx.page;
	let sel = ctx.selectors;
	let to = &ctx.config.timeouts;

	let queue = status::read_queue(page, sel).await.unwrap_or_default();
	info!(
		target = "aternos",
		wait_seconds = queue.wait_seconds,
		position = ?queue.position,
		waiting = ?queue.waiting_count,
		"waiting out start queue"
	);

	page.wait_for_selector(sel.queue_confirm, Duration::from_secs(queue.wait_seconds), to.poll).await?;
	page.click(sel.queue_confirm).await?;
	settle(ctx).await;
	page.wait_for_selector(sel.icon_running, to.start, to.poll).await?;
	Ok(())
}

/// Stops the server. Skipped when the baseline state is already Stopped.
pub(crate) async fn stop(ctx: SessionContext<'_>, info: &mut ServerInfo) {
	if baseline_state(info) == ServerState::Stopped {
		debug!(target = "aternos", "stop skipped, server is already stopped");
		return;
	}

	if let Err(err) = run_stop(ctx).await {
		warn!(target = "aternos", error = %err, "stop failed");
		info.record_error(&err);
	}
	reread_status(ctx, info).await;
}

async fn run_stop(ctx: SessionContext<'_>) -> Result<()> {
	let to = &ctx.config.timeouts;
	ctx.page.click(ctx.selectors.stop_button).await?;
	settle(ctx).await;
	ctx.page.wait_for_selector(ctx.selectors.icon_stopped, to.stop, to.poll).await?;
	Ok(())
}

/// Restarts the server. Skipped unless the baseline state is Running.
pub(crate) async fn restart(ctx: SessionContext<'_>, info: &mut ServerInfo) {
	if baseline_state(info) != ServerState::Running {
		debug!(target = "aternos", "restart skipped, server is not running");
		return;
	}

	if let Err(err) = run_restart(ctx).await {
		warn!(target = "aternos", error = %err, "restart failed");
		info.record_error(&err);
	}
	reread_status(ctx, info).await;
}

async fn run_restart(ctx: SessionContext<'_>) -> Result<()> {
	let to = &ctx.config.timeouts;
	ctx.page.click(ctx.selectors.restart_button).await?;
	settle(ctx).await;
	ctx.page.wait_for_selector(ctx.selectors.icon_running, to.start, to.poll).await?;
	Ok(())
}

/// Shares the server log and captures the share output. No precondition.
///
/// The share flow navigates away from the detail page, so the baseline
/// status is left standing rather than re-read against the log page.
pub(crate) async fn fetch_log(ctx: SessionContext<'_>, info: &mut ServerInfo) {
	if let Err(err) = run_fetch_log(ctx, info).await {
		warn!(target = "aternos", error = %err, "log fetch failed");
		info.record_error(&err);
	}
}

async fn run_fetch_log(ctx: SessionContext<'_>, info: &mut ServerInfo) -> Result<()> {
	let page = ctx.page;
	let sel = ctx.selectors;
	let to = &ctx.config.timeouts;

	page.navigate(&ctx.config.log_url()).await?;
	page.click(sel.log_share).await?;
	settle(ctx).await;
	page.wait_for_selector(sel.log_output, to.default, to.poll).await?;
	info.log = page.text(sel.log_output).await;
	Ok(())
}
