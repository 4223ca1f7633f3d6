use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use counter_client::config::{DEFAULT_API_HOST, DEFAULT_API_PORT, parse_api_type};
use counter_client::{
    ClientConfig, ClientError, ConfigError, CounterClient, CounterTransport, IncrementOutcome, StreamUpdate,
    TransportMode,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Client(#[from] ClientError),
    #[error("`watch` needs a streaming endpoint (ws or wss); push updates never arrive over http")]
    WatchNeedsStreaming,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("failed to wait for ctrl-c: {0}")]
    Signal(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "counter-cli", about = "Shared counter HTTP and websocket client")]
struct Cli {
    #[arg(long, env = "COUNTER_API_TYPE", default_value = "http", help = "http, https, ws or wss")]
    api_type: String,

    #[arg(long, env = "COUNTER_API_HOST", default_value = DEFAULT_API_HOST)]
    host: String,

    #[arg(long, env = "COUNTER_API_PORT", default_value_t = DEFAULT_API_PORT)]
    port: u16,

    #[arg(long, env = "COUNTER_REQUEST_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[arg(long, env = "COUNTER_SURFACE_STREAM_ERRORS", default_value_t = false)]
    surface_stream_errors: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the initial state (request/response only).
    Hello,
    /// Increment the counter.
    Increment {
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Stream pushed updates until the wait elapses or ctrl-c.
    Watch {
        #[arg(long, default_value_t = 0, help = "Increments to send once connected")]
        increments: usize,

        #[arg(long, help = "Exit after this many seconds instead of waiting for ctrl-c")]
        wait_secs: Option<u64>,
    },
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let (mode, tls) = parse_api_type(&self.api_type)?;
        Ok(ClientConfig {
            mode,
            tls,
            host: self.host.clone(),
            port: self.port,
            request_timeout: self.timeout_secs.map(Duration::from_secs),
            surface_stream_errors: self.surface_stream_errors,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = cli.client_config()?;
    let client = CounterClient::from_config(&config)?;

    let result = match cli.command {
        Command::Hello => run_hello(&client).await,
        Command::Increment { count } => run_increment(&client, count).await,
        Command::Watch { increments, wait_secs } => run_watch(&client, increments, wait_secs).await,
    };

    if let Err(CliError::Client(error)) = &result {
        print_json(error)?;
    }
    result
}

async fn run_hello(client: &CounterClient) -> Result<(), CliError> {
    let hello = client.hello().await?;
    print_json(&hello)
}

async fn run_increment(client: &CounterClient, count: usize) -> Result<(), CliError> {
    client.connect().await?;
    for _ in 0..count {
        match client.increment().await? {
            IncrementOutcome::Applied(state) => print_json(&state)?,
            IncrementOutcome::Sent => eprintln!("increment sent"),
        }
    }
    client.flush().await;
    Ok(())
}

async fn run_watch(client: &CounterClient, increments: usize, wait_secs: Option<u64>) -> Result<(), CliError> {
    if client.mode() != TransportMode::Streaming {
        return Err(CliError::WatchNeedsStreaming);
    }

    client.register_observer(Arc::new(|update: StreamUpdate| {
        if let Err(e) = print_json(&update) {
            tracing::warn!(error = %e, "failed to print update");
        }
    }));
    client.connect().await?;

    for _ in 0..increments {
        client.increment().await?;
    }

    match wait_secs {
        Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
        None => tokio::signal::ctrl_c().await?,
    }
    eprintln!("watch complete: endpoint={} increments={increments}", client.endpoint());
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
