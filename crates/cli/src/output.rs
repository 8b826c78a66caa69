//! Rendering of session results for humans and for JSON consumers.

use aternos::{ServerInfo, ServerState};
use colored::Colorize;

use crate::cli::OutputFormat;

pub fn print_info(info: &ServerInfo, format: OutputFormat) -> anyhow::Result<()> {
	match format {
		OutputFormat::Json => println!("{}", serde_json::to_string_pretty(info)?),
		OutputFormat::Text => print!("{}", render_text(info)),
	}
	Ok(())
}

fn render_text(info: &ServerInfo) -> String {
	let mut out = String::new();

	if let Some(name) = &info.name {
		out.push_str(&format!("Name:     {name}\n"));
		out.push_str(&format!("Address:  {name}.{}\n", aternos::SERVER_DOMAIN));
	}
	if let Some(id) = &info.id {
		out.push_str(&format!("Id:       {id}\n"));
	}

	if let Some(status) = &info.status {
		let state = colored_state(status.state);
		match &status.label {
			Some(label) => out.push_str(&format!("Status:   {state} ({label})\n")),
			None => out.push_str(&format!("Status:   {state}\n")),
		}
		if let Some(countdown) = &status.countdown {
			out.push_str(&format!("Uptime:   {countdown} remaining\n"));
		}
		if let Some(memory) = &status.memory {
			out.push_str(&format!("Memory:   {memory}\n"));
		}
		if let Some(queue) = &status.queue {
			let position = queue
				.position
				.zip(queue.waiting_count)
				.map(|(p, w)| format!(", position {p}/{w}"))
				.unwrap_or_default();
			out.push_str(&format!("Queue:    ~{}s wait{position}\n", queue.wait_seconds));
		}
	}

	if let Some(players) = &info.players {
		out.push_str(&format!("Players:  {}/{}\n", players.current, players.max));
	}
	if let (Some(software), Some(version)) = (&info.software, &info.version) {
		out.push_str(&format!("Software: {software} {version}\n"));
	}
	if let Some(log) = &info.log {
		out.push_str(&format!("Log:      {log}\n"));
	}
	if let Some(error) = &info.error {
		out.push_str(&format!("Error:    {}\n", error.red()));
	}
	out.push_str(&format!("Elapsed:  {}ms\n", info.elapsed_ms));

	out
}

fn colored_state(state: ServerState) -> colored::ColoredString {
	match state {
		ServerState::Running => "running".green(),
		ServerState::Stopped => "stopped".red(),
		ServerState::Queued => "queued".yellow(),
		ServerState::Loading => "loading".yellow(),
		ServerState::Unknown => "unknown".dimmed(),
	}
}
