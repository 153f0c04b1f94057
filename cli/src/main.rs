use std::fs;
use std::io::{self, Read};

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use host::{HostController, HostError, PushChannel, SyncClient, SyncError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("failed to read {path}: {source}")]
    ReadInput { path: String, source: io::Error },
    #[error(transparent)]
    Import(#[from] HostError),
    #[error(transparent)]
    Sync(#[from] SyncError),
}

#[derive(Parser, Debug)]
#[command(name = "mapmark", about = "Marker server CLI: upload, download, watch")]
struct Cli {
    #[arg(long, env = "MAPMARK_BASE_URL", default_value = "http://127.0.0.1:8085")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the server's marker list and pretty-print it.
    Download,
    /// Validate a JSON marker export and upload it as the new server set.
    Upload {
        #[arg(long, default_value = "-", help = "Input file path, or - for stdin")]
        input: String,
    },
    /// Subscribe to the push channel and print each update batch.
    Watch,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Download => run_download(&cli.base_url).await,
        Command::Upload { input } => run_upload(&cli.base_url, &input).await,
        Command::Watch => run_watch(&cli.base_url).await,
    };

    if let Err(error) = result {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

async fn run_download(base_url: &str) -> Result<(), CliError> {
    let drafts = SyncClient::new(base_url).download().await?;

    // A download is a destructive overwrite of local state.
    let mut host = HostController::new();
    host.apply_remote_snapshot(drafts);
    println!("{}", host.export_json());
    Ok(())
}

async fn run_upload(base_url: &str, input: &str) -> Result<(), CliError> {
    let text = read_input(input)?;

    // Run the paste through the host import path so bad input fails
    // here, with nothing sent.
    let mut host = HostController::new();
    host.import_json(&text)?;

    let markers: Vec<_> = host.markers().into_iter().cloned().collect();
    SyncClient::new(base_url).upload(&markers).await?;
    eprintln!("uploaded {} markers", markers.len());
    Ok(())
}

async fn run_watch(base_url: &str) -> Result<(), CliError> {
    let (tx, mut rx) = mpsc::channel(16);
    let push = PushChannel::connect(ws_url(base_url)?, tx);

    let mut host = HostController::new();
    while let Some(batch) = rx.recv().await {
        host.apply_remote_snapshot(batch);
        println!("{}", host.export_json());
    }

    push.close();
    eprintln!("push channel closed");
    Ok(())
}

fn ws_url(base_url: &str) -> Result<String, CliError> {
    if let Some(rest) = base_url.strip_prefix("http://") {
        return Ok(format!("ws://{}/api/ws", rest.trim_end_matches('/')));
    }
    if let Some(rest) = base_url.strip_prefix("https://") {
        return Ok(format!("wss://{}/api/ws", rest.trim_end_matches('/')));
    }
    Err(CliError::InvalidBaseUrl(base_url.to_owned()))
}

fn read_input(path: &str) -> Result<String, CliError> {
    let read = |path: &str| -> io::Result<String> {
        if path == "-" {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        } else {
            fs::read_to_string(path)
        }
    };
    read(path).map_err(|source| CliError::ReadInput { path: path.to_owned(), source })
}
