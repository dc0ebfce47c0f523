use std::path::PathBuf;

use anyhow::Context;
use cep_core::Config;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

use cep_server::{gateway, resolver, serve, telemetry::init_tracing};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cep-weather", version, about = "Postal code to temperature relay")]
pub struct Cli {
    /// Config file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the front-facing gateway (`POST /`).
    Gateway {
        /// Overrides `gateway.listen_addr`.
        #[arg(long)]
        listen: Option<String>,
    },

    /// Run the resolver (`GET /?cep=`).
    Resolver {
        /// Overrides `resolver.listen_addr`.
        #[arg(long)]
        listen: Option<String>,
    },

    /// Store the WeatherAPI key in the config file.
    Configure {
        /// Key issued by weatherapi.com.
        api_key: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Gateway { listen } => {
                let config = Config::load(self.config.as_deref())?;
                init_tracing(&config.log_level, config.log_format);

                let addr = listen.unwrap_or_else(|| config.gateway.listen_addr.clone());
                let app = gateway::from_config(&config)?;
                run_server("gateway", &addr, app).await
            }
            Command::Resolver { listen } => {
                let config = Config::load(self.config.as_deref())?;
                init_tracing(&config.log_level, config.log_format);

                let addr = listen.unwrap_or_else(|| config.resolver.listen_addr.clone());
                let app = resolver::from_config(&config)?;
                run_server("resolver", &addr, app).await
            }
            Command::Configure { api_key } => {
                let path = match self.config {
                    Some(path) => path,
                    None => Config::config_file_path()?,
                };

                let mut config = Config::load_from(&path)?;
                config.set_weather_api_key(api_key);
                config.weather_api_key()?;
                config.save_to(&path)?;

                println!("Saved WeatherAPI key to {}", path.display());
                Ok(())
            }
        }
    }
}

async fn run_server(name: &str, addr: &str, app: axum::Router) -> anyhow::Result<()> {
    let listener =
        TcpListener::bind(addr).await.with_context(|| format!("Failed to bind {name} to {addr}"))?;

    info!(service = name, addr = %listener.local_addr()?, "listening");
    serve(listener, app).await.with_context(|| format!("{name} server failed"))
}
