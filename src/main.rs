//! consolex - Actor-based API request console
//!
//! Architecture:
//! - Console driver - reads command lines, prints render events
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use consolex::config::{self, Settings};
use consolex::constants::{APP_NAME, APP_VERSION, LOG_FILE};
use consolex::messages::{parse_command, NetworkCommand, NetworkResponse, RenderEvent, UiEvent};
use consolex::{ui, AppActor, CollectionStore, HttpTransport, NetworkActor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let config_dir = config::config_dir();
    let settings = Settings::load(&config_dir);
    let origin = settings.origin_url()?;
    let storage = CollectionStore::open(&config_dir);
    tracing::info!(origin = %origin, dir = %config_dir.display(), "Starting {}", APP_NAME);

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderEvent>();

    // Spawn network actor
    let network_actor = NetworkActor::new(HttpTransport::new(settings.timeout()), net_resp_tx);
    let network = tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(settings, origin, storage, net_cmd_tx, render_tx);
    let app = tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    println!("{} {} - type 'help' for commands", APP_NAME, APP_VERSION);
    run_console(ui_tx, &mut render_rx).await?;

    let _ = app.await;
    let _ = network.await;
    Ok(())
}

/// Read command lines from stdin and print render events until quit
async fn run_console(
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderEvent>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    let _ = ui_tx.send(UiEvent::Quit);
                    break;
                };
                match parse_command(&line) {
                    Ok(Some(event)) => {
                        let quit = matches!(event, UiEvent::Quit);
                        let _ = ui_tx.send(event);
                        if quit {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(message) => println!("!! {}", message),
                }
            }
            Some(event) = render_rx.recv() => {
                println!("{}", ui::render_event(&event));
            }
        }
    }

    // Print whatever the app flushed while shutting down
    while let Some(event) = render_rx.recv().await {
        println!("{}", ui::render_event(&event));
    }

    Ok(())
}
