//! Site selector table.
//!
//! Every CSS selector the driver touches lives in one immutable struct, so
//! a panel layout change is a one-table edit rather than a hunt through the
//! session and action code. The defaults reproduce aternos.org's DOM
//! contract, which may change without notice.

/// Selector contract for the panel's DOM.
#[derive(Debug, Clone)]
pub struct SiteSelectors {
	/// Status icons, probed in this priority order.
	pub icon_stopped: &'static str,
	pub icon_running: &'static str,
	pub icon_queued: &'static str,
	pub icon_loading: &'static str,

	/// Human-readable status text next to the icon.
	pub status_label: &'static str,
	/// Left status sub-label (countdown when running, wait time when queued).
	pub status_left: &'static str,
	/// Right status sub-label (memory when running, queue position when queued).
	pub status_right: &'static str,

	pub login_user: &'static str,
	pub login_password: &'static str,
	pub login_submit: &'static str,
	pub login_error: &'static str,
	/// Post-login server list page marker.
	pub server_list: &'static str,

	pub server_card: &'static str,
	pub server_card_name: &'static str,

	pub server_id: &'static str,
	pub server_name: &'static str,
	pub players: &'static str,
	pub software: &'static str,
	pub version: &'static str,

	pub start_button: &'static str,
	pub stop_button: &'static str,
	pub restart_button: &'static str,
	/// Optional dialog shown after clicking start.
	pub start_confirmation: &'static str,
	/// Control offered when a queued start slot is granted.
	pub queue_confirm: &'static str,
	/// Cookie/choice consent dialog on the server detail page.
	pub consent_accept: &'static str,

	pub log_share: &'static str,
	pub log_output: &'static str,
}

impl SiteSelectors {
	/// Attribute-based card lookup for a known server id. Both the direct
	/// id match and the name-scan fallback resolve through this.
	pub fn server_card_by_id(&self, id: &str) -> String {
		format!("{}[data-id=\"{}\"]", self.server_card, id)
	}
}

impl Default for SiteSelectors {
	fn default() -> Self {
		Self {
			icon_stopped: "div.statuslabel i.fas.fa-stop-circle",
			icon_running: "div.statuslabel i.fas.fa-play-circle",
			icon_queued: "div.statuslabel i.fas.fa-clock",
			icon_loading: "div.statuslabel i.fas.fa-spinner-third",

			status_label: ".statuslabel-label",
			status_left: "span.server-status-label-left",
			status_right: "span.server-status-label-right.queue-position",

			login_user: "#user",
			login_password: "#password",
			login_submit: "#login",
			login_error: "div.login-error",
			server_list: "div.page-content.page-servers",

			server_card: "div.server-body",
			server_card_name: "div.server-body .server-name",

			server_id: "div.navigation-server-detail.navigation-server-id",
			server_name: "div.navigation-server-name",
			players: "#players",
			software: "#software",
			version: "#version",

			start_button: "#start",
			stop_button: "#stop",
			restart_button: "#restart",
			start_confirmation: "a.btn.btn-green",
			queue_confirm: "#confirm",
			consent_accept: "#accept-choices",

			log_share: "div.mclogs-share.btn.btn-main.btn-large.btn-no-margin",
			log_output: "div.share-dropdown-output",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn card_by_id_embeds_the_identifier() {
		let sel = SiteSelectors::default();
		assert_eq!(sel.server_card_by_id("abc123"), "div.server-body[data-id=\"abc123\"]");
	}
}
