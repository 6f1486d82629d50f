use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use event_gateway::config::{ClientCredentials, Config};
use event_gateway::constants::effective_timeslot_limit;
use event_gateway::gateway::EventGateway;
use event_gateway::logging;
use event_gateway::observability::metrics;
use event_gateway::server::{self, AppState};

#[derive(Parser)]
#[command(name = "event-gateway")]
#[command(about = "Caching gateway in front of the Universe ticketing API")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to EVENT_GATEWAY_CONFIG or ./config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Fetch one host's event list and print it as JSON
    List {
        #[arg(long)]
        host_id: Option<String>,
        /// Timeslots per event (1-1000)
        #[arg(long)]
        timeslot_limit: Option<String>,
    },
    /// Fetch a single event and print it as JSON
    Detail {
        #[arg(long)]
        event_id: String,
    },
    /// Run the upstream connectivity probe for a host
    Probe {
        #[arg(long)]
        host_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    let credentials = ClientCredentials::from_env();
    let gateway = EventGateway::from_config(&config, credentials)?;

    match cli.command {
        Commands::Serve { port } => {
            metrics::init();
            let port = port.unwrap_or(config.server.port);
            info!(port, "Starting event gateway");
            server::start_server(AppState::new(gateway), port)
                .await
                .map_err(|e| anyhow::anyhow!("server error: {}", e))?;
        }
        Commands::List {
            host_id,
            timeslot_limit,
        } => {
            let host_id = gateway.resolve_host_id(host_id.as_deref());
            let limit = effective_timeslot_limit(timeslot_limit.as_deref());
            let list = gateway.get_event_list(&host_id, Some(limit)).await?;
            println!("{}", serde_json::to_string_pretty(list.as_ref())?);
        }
        Commands::Detail { event_id } => {
            let detail = gateway.get_event_detail(&event_id).await?;
            println!("{}", serde_json::to_string_pretty(detail.as_ref())?);
        }
        Commands::Probe { host_id } => {
            let host_id = gateway.resolve_host_id(host_id.as_deref());
            let data = gateway.probe(&host_id).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
    }

    Ok(())
}
