/// SoundCloud CLI - fetch tracks and users from the SoundCloud API
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use soundcloud_client::{
    AsyncRequest, ClientConfig, CompletionLoop, CompletionQueue, Dispatcher, ReqwestTransport,
    SoundcloudClient,
};
use std::{path::PathBuf, sync::mpsc, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "soundcloud")]
#[command(about = "Query the SoundCloud API", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./soundcloud.toml if present)
    #[arg(short, long, global = true, env = "SOUNDCLOUD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a single track
    Track {
        /// Track identifier
        id: i64,
    },
    /// Show a single user
    User {
        /// User identifier
        id: i64,
    },
    /// List the tracks uploaded by a user
    UserTracks {
        /// User identifier
        id: i64,
    },
    /// Search tracks by free text
    Search {
        /// Search text
        query: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<u32>,
    },
}

type Completion<T> = Box<dyn FnOnce(soundcloud_client::Result<T>) + Send>;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soundcloud=info,soundcloud_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::load(cli.config.as_deref())?;
    tracing::info!("Using API at {}", config.api_url);

    // Requests run on the runtime; completions come back to this thread
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let (queue, mut completions) = CompletionQueue::new();
    let transport = Arc::new(ReqwestTransport::new(&config)?);
    let dispatcher = Dispatcher::with_runtime(transport, runtime.handle().clone(), queue);
    let client = SoundcloudClient::new(config, dispatcher);

    let output = match cli.command {
        Commands::Track { id } => fetch(&mut completions, |done| client.track(id, done))?,
        Commands::User { id } => fetch(&mut completions, |done| client.user(id, done))?,
        Commands::UserTracks { id } => {
            fetch(&mut completions, |done| client.user_tracks(id, done))?
        }
        Commands::Search { query, limit } => fetch(&mut completions, |done| {
            client.search_tracks(&query, limit, done)
        })?,
    };

    println!("{output}");
    Ok(())
}

/// Start one request, wait for its completion on this thread and render the
/// result as pretty JSON.
fn fetch<T, B>(completions: &mut CompletionLoop, build: B) -> anyhow::Result<String>
where
    T: Serialize + Send + 'static,
    B: FnOnce(Completion<T>) -> soundcloud_client::Result<AsyncRequest<T>>,
{
    let (tx, rx) = mpsc::channel();
    let mut request = build(Box::new(move |result| {
        let _ = tx.send(result);
    }))?;

    tracing::debug!("Requesting {}", request.descriptor().url());
    request.start()?;

    if !completions.run_next() {
        anyhow::bail!("completion loop closed before the request finished");
    }

    let value = rx
        .try_recv()
        .context("request finished without delivering a result")??;

    serde_json::to_string_pretty(&value).context("failed to render response")
}
