//! CLI command implementations
//!
//! Each invocation loads the configuration, opens the file-backed store,
//! opens the gateway (which declares indexes), runs one operation, and
//! prints its result.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::config::GatewayConfig;
use crate::gateway::{ConsoleNotifier, NewRecord, Notifier, RecordGateway};
use crate::observability::{Event, Logger};
use crate::store::FileStore;

use super::args::{Cli, Command};
use super::errors::CliResult;
use super::io::write_response;

/// Store file used when neither the config nor `--data` names one
pub const DEFAULT_DATA_FILE: &str = "./docgate.db.json";

/// Parse arguments and run on a single-threaded runtime
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_command(cli))
}

/// Run one parsed invocation and print its result
pub async fn run_command(cli: Cli) -> CliResult<()> {
    let config = load_config(cli.config.as_deref(), cli.data)?;
    Logger::set_min_severity(config.severity()?);
    if let Some(path) = &cli.config {
        Logger::event(
            Event::ConfigLoaded,
            &[("path", path.display().to_string().as_str())],
        );
    }

    let gateway = open_gateway(&config, Arc::new(ConsoleNotifier)).await?;
    let data = execute(&gateway, cli.command).await?;
    write_response(data)
}

/// Resolve the configuration: file if given, defaults otherwise, then `--data`
pub fn load_config(path: Option<&Path>, data: Option<PathBuf>) -> CliResult<GatewayConfig> {
    let mut config = match path {
        Some(path) => GatewayConfig::load(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(data) = data {
        config.data_file = Some(data);
    }
    Ok(config)
}

/// Open the configured file store and a gateway over it
pub async fn open_gateway(
    config: &GatewayConfig,
    notifier: Arc<dyn Notifier>,
) -> CliResult<RecordGateway> {
    let path = config
        .data_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
    let store = Arc::new(FileStore::open(&path).await?);
    Ok(RecordGateway::open(store, notifier, config).await?)
}

/// Run one command against an open gateway, returning the JSON to print
pub async fn execute(gateway: &RecordGateway, command: Command) -> CliResult<Value> {
    let data = match command {
        Command::Init => serde_json::to_value(gateway.ensure_indexes().await?)?,
        Command::List => serde_json::to_value(gateway.list().await?)?,
        Command::Get { id } => serde_json::to_value(gateway.get(&id).await)?,
        Command::Add { name } => serde_json::to_value(gateway.add(NewRecord::new(name)).await?)?,
        Command::Update { id, name } => {
            let mut record = gateway.try_get(&id).await?;
            record.name = name;
            serde_json::to_value(gateway.update(&record).await)?
        }
        Command::Delete { id } => serde_json::to_value(gateway.delete(id.as_str()).await)?,
        Command::Search { term } => serde_json::to_value(gateway.search(&term).await)?,
    };
    Ok(data)
}
