//! # memento CLI
//!
//! Command-line front end over [`MementoClient`]. Every command prints its
//! result as pretty JSON. Set `RUST_LOG=memento_rs=debug` to watch the
//! discovery and negotiation hops.

use clap::{Parser, Subcommand};
use memento_rs::protocol::parse_user_datetime;
use memento_rs::{ClientConfig, MementoClient};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "memento")]
#[command(about = "Find archived versions of web resources (RFC 7089)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Negotiate for the memento closest to a datetime
    Info {
        uri: String,
        /// HTTP date, RFC 3339 or YYYY-MM-DDTHH:MM:SSZ (default: now)
        #[arg(short, long)]
        datetime: Option<String>,
        /// TimeGate base used when the resource has no native TimeGate
        #[arg(long)]
        timegate: Option<String>,
        /// Skip native TimeGate discovery
        #[arg(long)]
        no_native: bool,
    },
    /// Show the TimeGate a resource advertises
    Timegate {
        uri: String,
        #[arg(short, long)]
        datetime: Option<String>,
    },
    /// Show the original resource behind a URI
    Original { uri: String },
    /// List every memento in the resource's TimeMap
    Timemap {
        uri: String,
        /// TimeMap base used when the resource has no native TimeMap
        #[arg(long)]
        timemap: Option<String>,
    },
    /// List archives from the registry
    Archives {
        #[arg(long)]
        registry: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::default();

    match cli.command {
        Commands::Info {
            uri,
            datetime,
            timegate,
            no_native,
        } => {
            if let Some(timegate) = timegate {
                config.timegate_uri = timegate;
            }
            config.check_native_timegate = !no_native;
            let client = MementoClient::with_config(config)?;
            let accept = datetime.as_deref().map(parse_user_datetime).transpose()?;
            print_json(&client.get_memento_info(&uri, accept).await?)?;
        }
        Commands::Timegate { uri, datetime } => {
            let client = MementoClient::with_config(config)?;
            let accept = datetime.as_deref().map(parse_user_datetime).transpose()?;
            print_json(&client.get_native_timegate_uri(&uri, accept).await?)?;
        }
        Commands::Original { uri } => {
            let client = MementoClient::with_config(config)?;
            print_json(&client.get_original_uri(&uri).await?)?;
        }
        Commands::Timemap { uri, timemap } => {
            if let Some(timemap) = timemap {
                config.timemap_uri = timemap;
            }
            let client = MementoClient::with_config(config)?;
            print_json(&client.get_all_mementos(&uri, None).await?)?;
        }
        Commands::Archives { registry } => {
            if let Some(registry) = registry {
                config.archive_registry_uri = registry;
            }
            let client = MementoClient::with_config(config)?;
            print_json(&client.archive_list().await?)?;
        }
    }

    Ok(())
}
