use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use parla_types::AppEvent;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::services::Services;
use crate::state::AppState;

pub mod clipboard;
pub mod languages;
pub mod speech;
pub mod text_input;

/// How long Quit waits for pending translations when no call timeout is set
const QUIT_GRACE: Duration = Duration::from_secs(10);

use clipboard::handle_copy;
use languages::{handle_language_change, handle_list_languages, handle_swap};
use speech::{handle_listen, handle_speak, handle_stop};
use text_input::{handle_clear, handle_text_input};

/// Senders an event handler may need
#[derive(Clone)]
pub struct Outbox {
    /// Back into this loop (speech transcripts, swap re-issue)
    pub to_app: AsyncSender<AppEvent>,
    /// Out to the console
    pub to_ui: AsyncSender<AppEvent>,
}

impl Outbox {
    pub async fn status(&self, message: impl Into<String>) -> anyhow::Result<()> {
        self.to_ui.send(AppEvent::Status(message.into())).await?;
        Ok(())
    }
}

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    services: Arc<Services>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    outbox: Outbox,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_to_app_rx.recv() => event?,
        };

        tracing::debug!(
            "[EVENT_LOOP] EVENT RECEIVED: {:?}",
            std::mem::discriminant(&event)
        );
        handle_events(state.clone(), services.clone(), &outbox, &cancel, event).await?;
    }

    tracing::info!("[EVENT_LOOP] Stopped");
    Ok(())
}

async fn handle_events(
    state: Arc<AppState>,
    services: Arc<Services>,
    outbox: &Outbox,
    cancel: &CancellationToken,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::TextInput(text) => {
            tracing::debug!("TextInput received: '{}' chars", text.len());
            handle_text_input(state, services, text, outbox).await?;
        }
        AppEvent::RawTextInput { text, source } => {
            tracing::info!("Text from {:?}: {}", source, text);
            handle_text_input(state, services, text, outbox).await?;
        }
        AppEvent::ClearInput => handle_clear(&services),
        AppEvent::SwapLanguages => handle_swap(state, outbox).await?,
        AppEvent::SetSourceLanguage(code) => {
            handle_language_change(state, code, true, outbox).await?;
        }
        AppEvent::SetTargetLanguage(code) => {
            handle_language_change(state, code, false, outbox).await?;
        }
        AppEvent::Reachability(online) => {
            // announced by `announce_connectivity`
            state.connectivity.set_online(online);
        }
        AppEvent::CopyLast => handle_copy(state, &services, outbox).await?,
        AppEvent::SpeakLast => handle_speak(state, &services, outbox).await?,
        AppEvent::StartListening => handle_listen(state, &services, outbox).await?,
        AppEvent::StopSpeech => handle_stop(&services),
        AppEvent::ListLanguages => handle_list_languages(outbox).await?,
        AppEvent::ShowStats => {
            let stats = state.stats.read().await.clone();
            outbox.status(stats.to_string()).await?;
        }
        AppEvent::Quit => {
            tracing::info!("Quit requested");
            finish_pending(&services).await;
            cancel.cancel();
        }
        AppEvent::ShowTranslation { .. } | AppEvent::ShowFailure { .. } | AppEvent::Status(_) => {
            // UI-only events, ignore in backend
        }
    }

    Ok(())
}

/// Let in-flight translations publish before shutting down
async fn finish_pending(services: &Services) {
    let pending = services.session.in_flight();
    if pending == 0 {
        return;
    }

    let grace = services
        .orchestrator
        .timeout()
        .map_or(QUIT_GRACE, |limit| limit + Duration::from_secs(1));
    tracing::info!("Waiting up to {:?} for {} pending request(s)", grace, pending);

    if tokio::time::timeout(grace, services.session.idle()).await.is_err() {
        tracing::warn!("Pending requests did not finish, quitting anyway");
    }
}

/// Post a status line whenever reachability flips
pub async fn announce_connectivity(
    mut changes: watch::Receiver<bool>,
    outbox: Outbox,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        let online = *changes.borrow_and_update();
        outbox.status(if online { "Online" } else { "Offline" }).await?;
    }

    Ok(())
}
