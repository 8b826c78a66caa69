use clap::{Args, Parser, Subcommand, ValueEnum};

/// Root CLI for the panel driver.
#[derive(Parser, Debug)]
#[command(name = "aternos")]
#[command(about = "Drive an Aternos server through its web panel")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: text (default) or json
	#[arg(short = 'f', long, global = true, value_enum, default_value = "text")]
	pub format: OutputFormat,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Start the server.
	Start(StartArgs),
	/// Stop the server.
	Stop(ServerArgs),
	/// Restart the server.
	Restart(ServerArgs),
	/// Read server information, including the shared log.
	Info(ServerArgs),
	/// Print the server's public hostname.
	Hostname(ServerArgs),
}

#[derive(Args, Debug, Clone)]
pub struct StartArgs {
	/// Server name or id (first listed server when omitted).
	pub server: Option<String>,

	/// Hold the session open through a start queue.
	#[arg(long)]
	pub wait_queue: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
	/// Server name or id (first listed server when omitted).
	pub server: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
	Text,
	Json,
}
