use std::io::BufRead;
use std::sync::{Arc, Mutex};

use kanal::AsyncSender;
use parla_types::{AppEvent, TextSource};
use tokio_util::sync::CancellationToken;

use crate::command::{HELP, parse_line};
use crate::state::AppState;

/// Feed console lines into the app until stdin closes or shutdown
///
/// Stdin is read on a plain thread so a pending read never holds up runtime shutdown.
pub async fn console_input(
    ui_to_app_tx: AsyncSender<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let handle = tokio::runtime::Handle::current();
    let reader_cancel = cancel.clone();

    std::thread::Builder::new()
        .name("console-input".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                if reader_cancel.is_cancelled() {
                    return;
                }
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::error!("Console read failed: {}", e);
                        break;
                    }
                };
                let sent = handle.block_on(dispatch_line(&line, &ui_to_app_tx, &app_to_ui_tx));
                if let Err(e) = sent {
                    tracing::error!("Console input dropped: {}", e);
                    return;
                }
            }

            tracing::info!("Console input closed");
            let _ = handle.block_on(ui_to_app_tx.send(AppEvent::Quit));
        })?;

    cancel.cancelled().await;
    Ok(())
}

async fn dispatch_line(
    line: &str,
    ui_to_app_tx: &AsyncSender<AppEvent>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    if matches!(line.trim(), ":help" | ":h" | "?") {
        app_to_ui_tx.send(AppEvent::Status(HELP.to_string())).await?;
        return Ok(());
    }

    match parse_line(line) {
        Ok(event) => ui_to_app_tx.send(event).await?,
        Err(message) => app_to_ui_tx.send(AppEvent::Status(message)).await?,
    }
    Ok(())
}

/// Watcher for websocket or clipboard text
pub async fn watcher_io(
    state: Arc<AppState>,
    clipboard_skip: Arc<Mutex<Option<String>>>,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let (listen_to_ws, ws_url, watch_clipboard) = {
        let config = state.config.read().await;
        (
            config.network.listen_to_ws,
            config.network.ws_url.clone(),
            config.network.watch_clipboard,
        )
    };

    if listen_to_ws {
        tracing::info!("Starting WebSocket listener on {}", ws_url);

        let tx = event_tx.clone();
        tokio::select! {
            result = parla_io::ws::start_ws_listener(&ws_url, move |text| {
                forward(&tx, text, TextSource::Websocket);
            }) => {
                if let Err(e) = result {
                    tracing::error!("WebSocket listener error: {}", e);
                }
            }
            _ = cancel.cancelled() => {
                tracing::info!("WebSocket listener stopping");
            }
        }
    } else if watch_clipboard {
        tracing::info!("Starting clipboard watcher");

        let tx = event_tx.clone();
        tokio::select! {
            result = parla_io::clipboard::watch_clipboard(clipboard_skip, move |text| {
                forward(&tx, text, TextSource::Clipboard);
            }) => {
                if let Err(e) = result {
                    tracing::error!("Clipboard watcher error: {}", e);
                }
            }
            _ = cancel.cancelled() => {
                tracing::info!("Clipboard watcher stopping");
            }
        }
    } else {
        cancel.cancelled().await;
    }

    Ok(())
}

pub(crate) fn forward(tx: &AsyncSender<AppEvent>, text: String, source: TextSource) {
    let tx = tx.clone();
    tokio::spawn(async move {
        if let Err(e) = tx.send(AppEvent::RawTextInput { text, source }).await {
            tracing::error!("Failed to send {:?} text to app: {}", source, e);
        }
    });
}
