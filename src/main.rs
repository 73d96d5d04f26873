//! Command-line client for a VyOS device configuration.
//!
//! ```text
//! vyos-config show "firewall name TEST"
//! vyos-config update "firewall name TEST" '{"default-action": "drop"}'
//! vyos-config compile "firewall name TEST" '{"default-action": "drop"}'
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use vyos_config::config::{read_config_file, resolve_config, CliOverrides, ClientConfig};
use vyos_config::observability::logging;
use vyos_config::patch::PatchError;
use vyos_config::{ConfigCache, ConfigPath, ConfigResource, ConfigValue, PatchCompiler};

#[derive(Parser)]
#[command(name = "vyos-config")]
#[command(about = "Read and write VyOS configuration over the HTTP API", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API endpoint, overriding the configuration file.
    ///
    /// VYOS_ENDPOINT is used only when neither this flag nor the file sets one.
    #[arg(short, long)]
    endpoint: Option<String>,

    /// API key, overriding the configuration file.
    ///
    /// VYOS_API_KEY is used only when neither this flag nor the file sets one.
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the subtree at a path (the whole tree when omitted)
    Show {
        #[arg(default_value = "")]
        path: String,
    },
    /// Set a single leaf value
    Set { path: String, value: String },
    /// Delete a path and everything below it
    Delete { path: String },
    /// Replace the subtree at a path with a JSON value
    Update { path: String, value: String },
    /// Configure a path that does not exist yet
    Create { path: String, value: String },
    /// Print the batch an update would submit, without contacting the device
    Compile { path: String, value: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Commands::Compile { path, value } = &cli.command {
        let config = match &cli.config {
            Some(file) => read_config_file(file)?,
            None => ClientConfig::default(),
        };
        logging::init(&config.logging);

        let target = ConfigPath::parse(path)?;
        let ops = PatchCompiler::new(config.patch.null_values).compile(&target, value)?;
        println!("{}", serde_json::to_string_pretty(&ops)?);
        return Ok(());
    }

    let overrides = CliOverrides {
        endpoint: cli.endpoint.clone(),
        api_key: cli.api_key.clone(),
    };
    let config = resolve_config(cli.config.as_deref(), &overrides)?;
    logging::init(&config.logging);

    tracing::debug!(
        endpoint = %config.remote.endpoint,
        timeout_secs = config.remote.timeout_secs,
        "Configuration loaded"
    );

    let cache = Arc::new(ConfigCache::from_config(&config)?);
    let resource = ConfigResource::new(Arc::clone(&cache));

    match cli.command {
        Commands::Show { path } => {
            let value = cache.show(&ConfigPath::parse(&path)?).await?;
            print_value(&value.unwrap_or(ConfigValue::Null))?;
        }
        Commands::Set { path, value } => {
            let leaf = ConfigValue::parse_leaf(&value).map_err(PatchError::Decode)?;
            cache.set(&ConfigPath::parse(&path)?, &leaf).await?;
        }
        Commands::Delete { path } => {
            resource.delete(&path).await?;
        }
        Commands::Update { path, value } => {
            let state = resource.update(&path, &value).await?;
            println!("{}", state.value);
        }
        Commands::Create { path, value } => {
            let state = resource.create(&path, &value).await?;
            println!("{}", state.id);
        }
        Commands::Compile { .. } => {}
    }

    Ok(())
}

fn print_value(value: &ConfigValue) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
