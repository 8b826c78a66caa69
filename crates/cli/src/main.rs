mod cli;
mod logging;
mod output;

use anyhow::Context;
use aternos::{AternosClient, Config};
use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	match run(cli).await {
		Ok(clean) => {
			if !clean {
				std::process::exit(1);
			}
		}
		Err(err) => {
			eprintln!("error: {err:#}");
			std::process::exit(1);
		}
	}
}

/// Runs one command. Returns false when the session reported an error, so
/// the exit code reflects it even though the driver itself never fails.
async fn run(cli: Cli) -> anyhow::Result<bool> {
	let config = Config::from_env().context("loading panel credentials")?;
	let client = AternosClient::new(config);

	let info = match &cli.command {
		Commands::Start(args) => {
			info!(target = "aternos", server = ?args.server, wait_queue = args.wait_queue, "starting server");
			client.start(args.server.as_deref(), args.wait_queue).await
		}
		Commands::Stop(args) => {
			info!(target = "aternos", server = ?args.server, "stopping server");
			client.stop(args.server.as_deref()).await
		}
		Commands::Restart(args) => {
			info!(target = "aternos", server = ?args.server, "restarting server");
			client.restart(args.server.as_deref()).await
		}
		Commands::Info(args) => client.get_info(args.server.as_deref()).await,
		Commands::Hostname(args) => {
			return match client.hostname(args.server.as_deref()).await {
				Some(hostname) => {
					println!("{hostname}");
					Ok(true)
				}
				None => Err(anyhow::anyhow!("could not determine the server hostname")),
			};
		}
	};

	output::print_info(&info, cli.format)?;
	Ok(info.error.is_none())
}
