use std::sync::Arc;

use kanal::AsyncReceiver;
use parla_io::capability::speak_outcome;
use parla_io::{CapabilityError, SpeechEvent};
use parla_types::{AppEvent, TextSource};
use tokio_util::sync::CancellationToken;

use crate::events::Outbox;
use crate::services::Services;
use crate::state::AppState;

pub async fn handle_speak(
    state: Arc<AppState>,
    services: &Services,
    outbox: &Outbox,
) -> anyhow::Result<()> {
    let Some(playback) = services.playback.clone() else {
        return outbox.status("Speech playback is not configured").await;
    };

    let Some(outcome) = state.last_outcome.read().await.clone() else {
        return outbox.status("Nothing to speak yet").await;
    };

    if outcome.actionable_text().is_none() {
        return outbox.status("Nothing to speak").await;
    }

    let outbox = outbox.clone();
    tokio::spawn(async move {
        match speak_outcome(playback.as_ref(), &outcome).await {
            Ok(()) | Err(CapabilityError::Cancelled) => {}
            Err(e) => {
                tracing::warn!("Playback failed: {}", e);
                let _ = outbox.status(format!("Playback failed: {e}")).await;
            }
        }
    });

    Ok(())
}

/// Capture one utterance in the source language and translate it
pub async fn handle_listen(
    state: Arc<AppState>,
    services: &Services,
    outbox: &Outbox,
) -> anyhow::Result<()> {
    let Some(capture) = services.capture.clone() else {
        return outbox.status("Speech capture is not configured").await;
    };

    let lang = state.languages.read().await.source.clone();
    outbox.status(format!("Listening ({lang})...")).await?;

    let outbox = outbox.clone();
    tokio::spawn(async move {
        match capture.capture(&lang).await {
            Ok(text) => {
                if let Err(e) = outbox
                    .to_app
                    .send(AppEvent::RawTextInput {
                        text,
                        source: TextSource::Speech,
                    })
                    .await
                {
                    tracing::error!("Failed to send transcript to app: {}", e);
                }
            }
            // reported through the lifecycle events
            Err(CapabilityError::Cancelled) => {}
            Err(e) => {
                tracing::warn!("Speech capture failed: {}", e);
                let _ = outbox.status(format!("Speech capture failed: {e}")).await;
            }
        }
    });

    Ok(())
}

pub fn handle_stop(services: &Services) {
    if let Some(capture) = &services.capture {
        capture.cancel();
    }
    if let Some(playback) = &services.playback {
        playback.cancel();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechChannel {
    Capture,
    Playback,
}

/// Console line for a lifecycle event.
///
/// Failures are left to the handler that started the command, which has the error.
pub fn speech_status(channel: SpeechChannel, event: &SpeechEvent) -> Option<&'static str> {
    match (channel, event) {
        (SpeechChannel::Playback, SpeechEvent::Started) => Some("Speaking..."),
        (SpeechChannel::Playback, SpeechEvent::Cancelled) => Some("Playback stopped"),
        (SpeechChannel::Capture, SpeechEvent::Cancelled) => Some("Listening stopped"),
        (SpeechChannel::Capture, SpeechEvent::Finished) => Some("Got it"),
        _ => None,
    }
}

/// Relay speech lifecycle events to the console until shutdown
pub async fn forward_speech_events(
    channel: SpeechChannel,
    events: AsyncReceiver<SpeechEvent>,
    outbox: Outbox,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = events.recv() => match event {
                Ok(event) => event,
                Err(_) => break,
            },
        };

        tracing::debug!("{:?} speech event: {:?}", channel, event);
        if let Some(message) = speech_status(channel, &event) {
            outbox.status(message).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    #[test]
    fn failures_are_left_to_the_handler() {
        let failed = SpeechEvent::Failed("exit 1".into());
        assert_eq!(speech_status(SpeechChannel::Playback, &failed), None);
        assert_eq!(speech_status(SpeechChannel::Capture, &failed), None);
        assert_eq!(
            speech_status(SpeechChannel::Capture, &SpeechEvent::Cancelled),
            Some("Listening stopped")
        );
    }

    #[tokio::test]
    async fn lifecycle_events_reach_the_console() {
        let (to_app, _app_rx) = kanal::unbounded_async();
        let (to_ui, ui_rx) = kanal::unbounded_async();
        let outbox = Outbox { to_app, to_ui };
        let (events_tx, events_rx) = kanal::unbounded_async();
        let cancel = CancellationToken::new();

        let task = tokio::spawn(forward_speech_events(
            SpeechChannel::Playback,
            events_rx,
            outbox,
            cancel.clone(),
        ));

        events_tx.send(SpeechEvent::Started).await.unwrap();
        events_tx.send(SpeechEvent::Finished).await.unwrap();
        events_tx.send(SpeechEvent::Cancelled).await.unwrap();

        for expected in ["Speaking...", "Playback stopped"] {
            match timeout(Duration::from_secs(1), ui_rx.recv()).await {
                Ok(Ok(AppEvent::Status(message))) => assert_eq!(message, expected),
                other => panic!("unexpected: {:?}", other.map(|r| r.is_ok())),
            }
        }

        cancel.cancel();
        assert!(task.await.unwrap().is_ok());
    }
}
