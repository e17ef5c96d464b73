use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use promptd::client::CompletionClient;
use promptd::config::Config;
use promptd::dispatch::Dispatcher;
use promptd::{server, tasks};

#[derive(Parser, Debug)]
#[command(name = "promptd", version, about = "LLM-classified task dispatch service")]
struct Cli {
    /// Address to listen on
    #[arg(short, long, default_value = "0.0.0.0:8000")]
    addr: SocketAddr,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default)
    Serve,
    /// Classify a single prompt and print the selection (debug utility)
    Classify {
        /// Free-text task description
        prompt: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let cfg = Config::from_env()?;

    match cli.command {
        Some(Command::Classify { prompt }) => {
            let client = CompletionClient::new(&cfg);
            let selection = client.classify(&prompt).await?;
            println!("{}", serde_json::to_string_pretty(&selection)?);
            Ok(())
        }
        Some(Command::Serve) | None => {
            let dispatcher = Arc::new(Dispatcher::new(
                CompletionClient::new(&cfg),
                tasks::registry(),
                cfg.data_root.clone(),
            ));

            let srv = server::start_server(cli.addr, dispatcher, cfg.data_root.clone()).await?;
            info!(addr = %srv.addr, model = %cfg.model, "promptd ready");

            tokio::signal::ctrl_c().await?;
            info!("shutting down");
            srv.handle.abort();
            Ok(())
        }
    }
}
