//! Hydrant provider host: serves FireHydrant data sources.

#![forbid(unsafe_code)]

mod deferred_runbook_client;
mod provider_config;

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use hydrant_application::{
    DataSourceRegistry, RunbookClient, RunbookDataSource, RunbookReader,
};
use hydrant_core::{AppError, AppResult, Diagnostic, Diagnostics, RequestContext};
use hydrant_infrastructure::ResourceState;
use serde_json::{Value, json};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::deferred_runbook_client::DeferredRunbookClient;
use crate::provider_config::ProviderConfig;

const USAGE: &str = "usage: hydrant-provider schema | hydrant-provider read <data_source> <config-json>";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Schema,
    Read { data_source: String, config: Value },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    match run().await {
        Ok(exit_code) => exit_code,
        Err(error) => {
            error!(error = %error, "hydrant-provider failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> AppResult<ExitCode> {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = parse_command(args.as_slice())?;

    let client = DeferredRunbookClient::new(ProviderConfig::load);
    let registry = build_registry(Arc::new(client))?;
    info!(
        data_sources = registry.schemas().len(),
        "hydrant-provider started"
    );

    match command {
        Command::Schema => {
            print_json(&json!({ "data_sources": registry.schemas() }))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Read {
            data_source,
            config,
        } => match read_data_source(&registry, data_source.as_str(), &config).await {
            Ok(state) => {
                print_json(&state)?;
                Ok(ExitCode::SUCCESS)
            }
            Err(diagnostics) => {
                print_json(&json!({ "diagnostics": diagnostics }))?;
                Ok(ExitCode::FAILURE)
            }
        },
    }
}

fn parse_command(args: &[String]) -> AppResult<Command> {
    match args {
        [command] if command == "schema" => Ok(Command::Schema),
        [command, data_source, config] if command == "read" => {
            let config = serde_json::from_str::<Value>(config).map_err(|error| {
                AppError::Validation(format!("data source configuration is not valid JSON: {error}"))
            })?;

            Ok(Command::Read {
                data_source: data_source.clone(),
                config,
            })
        }
        _ => Err(AppError::Validation(USAGE.to_owned())),
    }
}

fn build_registry(client: Arc<dyn RunbookClient>) -> AppResult<DataSourceRegistry> {
    let mut registry = DataSourceRegistry::new();
    registry.register(Arc::new(RunbookDataSource::new(RunbookReader::new(client))))?;
    Ok(registry)
}

/// Reads one data source; a failed read yields diagnostics and no state.
async fn read_data_source(
    registry: &DataSourceRegistry,
    type_name: &str,
    config: &Value,
) -> Result<ResourceState, Diagnostics> {
    let Some(data_source) = registry.get(type_name) else {
        return Err(Diagnostic::error(format!("unknown data source '{type_name}'")).into());
    };

    let mut state = ResourceState::new(data_source.schema());
    let diagnostics = registry
        .read(type_name, &RequestContext::background(), config, &mut state)
        .await;

    if diagnostics.has_errors() {
        return Err(diagnostics);
    }

    Ok(state)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> AppResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|error| AppError::Internal(format!("failed to encode output: {error}")))?;
    println!("{text}");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
