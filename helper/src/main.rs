use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use todoist_helper::config::Cli;
use todoist_helper::{Inbound, Outbound, TodoistHelper, UreqTransport};

fn init_logging() {
    // stdout carries notifications, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    info!("starting todoist helper");

    let bootstrap = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_notifications(rx));
    let helper = TodoistHelper::new(UreqTransport::new(), tx);

    let mut in_flight: Vec<JoinHandle<()>> = Vec::new();
    if let Some(config) = bootstrap {
        info!(?config, "config loaded");
        let config = helper.session().replace(config);
        if cli.fetch_on_start {
            in_flight.push(helper.fetch_snapshot(config));
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<Inbound>(&line) {
                    Ok(notification) => {
                        in_flight.retain(|handle| !handle.is_finished());
                        in_flight.push(helper.handle(notification));
                    }
                    Err(e) => warn!(error = %e, "skipping unreadable notification"),
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "failed to read stdin");
                break;
            }
        }
    }

    debug!(pending = in_flight.len(), "stdin closed; waiting for in-flight requests");
    for handle in in_flight {
        if let Err(e) = handle.await {
            error!(error = %e, "operation task failed");
        }
    }
    drop(helper);
    if let Err(e) = writer.await {
        error!(error = %e, "notification writer failed");
    }
    info!("todoist helper stopped");
}

async fn write_notifications(mut rx: mpsc::UnboundedReceiver<Outbound>) {
    let mut stdout = tokio::io::stdout();
    while let Some(notification) = rx.recv().await {
        let mut line = match serde_json::to_string(&notification) {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "could not serialize notification");
                continue;
            }
        };
        line.push('\n');
        if let Err(e) = stdout.write_all(line.as_bytes()).await {
            error!(error = %e, "failed to write notification");
            return;
        }
        if let Err(e) = stdout.flush().await {
            error!(error = %e, "failed to flush notification");
            return;
        }
    }
}
