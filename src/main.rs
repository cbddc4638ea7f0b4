//! DdOaListDownload service entry point.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dd_oa_list_download::cache::CacheClient;
use dd_oa_list_download::config::Config;
use dd_oa_list_download::metrics;
use dd_oa_list_download::Application;

/// DdOaListDownload service.
#[derive(Parser, Debug)]
#[command(name = "dd-oa-list-download")]
#[command(about = "Health and legacy HTTP endpoints backed by MySQL and Redis")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP listen port (overrides SERVER_PORT).
    #[arg(short, long)]
    port: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (default).
    Serve {
        /// HTTP listen port (overrides SERVER_PORT).
        #[arg(short, long)]
        port: Option<String>,
    },

    /// Print the resolved configuration with secrets masked.
    CheckConfig,

    /// Probe the Redis server once.
    CheckCache,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("dd_oa_list_download=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    metrics::init_metrics();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::CheckCache) => cmd_check_cache().await,
        Some(Command::Serve { port }) => cmd_serve(port.or(args.port)).await,
        None => cmd_serve(args.port).await,
    }
}

fn load_config() -> anyhow::Result<Config> {
    Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e.into()
    })
}

/// Print the resolved configuration.
fn cmd_check_config() -> anyhow::Result<()> {
    let config = load_config()?;

    println!("======================================================================");
    println!("DDOA LIST DOWNLOAD - CONFIGURATION CHECK");
    println!("======================================================================");
    println!("{}", config.summary());
    println!(
        "  MySQL URL: mysql://{}:****@{}:{}/{}?charset={}",
        config.mysql_username,
        config.mysql_host,
        config.mysql_port,
        config.mysql_dbname,
        config.mysql_charset,
    );
    println!("======================================================================");

    Ok(())
}

/// Probe the cache once and report.
async fn cmd_check_cache() -> anyhow::Result<()> {
    let config = load_config()?;

    println!("======================================================================");
    println!("DDOA LIST DOWNLOAD - CACHE CHECK");
    println!("======================================================================");

    let cache = CacheClient::new(&config)?;
    print!("Pinging {}... ", cache.addr());
    match cache.ping().await {
        Ok(pong) => {
            println!("OK");
            println!("  Response: {}", pong);
            println!("======================================================================");
            Ok(())
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            println!("======================================================================");
            Err(e.into())
        }
    }
}

/// Run the HTTP service.
async fn cmd_serve(port_override: Option<String>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = load_config()?;

    if let Some(port) = port_override {
        config.server_port = port;
    }

    let app = Application::build(config).await?;
    let server = app.bind().await?;
    server.run().await?;

    Ok(())
}
