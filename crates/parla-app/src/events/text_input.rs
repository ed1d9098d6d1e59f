use std::sync::Arc;

use parla_core::{Outcome, Session, Ticket, TranslationFailure};
use parla_types::{AppEvent, FailureKind, TranslationRequest, TranslationResult};

use crate::events::Outbox;
use crate::services::Services;
use crate::state::AppState;

/// Resolve `text` with the current languages without blocking the event loop.
///
/// A newer input supersedes this one; its result is then dropped.
pub async fn handle_text_input(
    state: Arc<AppState>,
    services: Arc<Services>,
    text: String,
    outbox: &Outbox,
) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        // Cleared input: nothing to show, abandon whatever is pending
        handle_clear(&services);
        return Ok(());
    }

    let pair = state.languages.read().await.clone();
    let request = TranslationRequest::new(text, pair.source, pair.target);
    let ticket = services.session.issue();
    tracing::debug!("Request {} issued", ticket.id);

    let to_ui = outbox.to_ui.clone();
    tokio::spawn(async move {
        let resolution = services
            .session
            .run(&ticket, services.orchestrator.resolve(&request))
            .await;

        let event = match resolution {
            Some(resolution) => {
                publish(&state, &services.session, &ticket, &request, resolution).await
            }
            None => {
                state.stats.write().await.superseded += 1;
                None
            }
        };

        if let Some(event) = event
            && let Err(e) = to_ui.send(event).await
        {
            tracing::error!("Failed to send translation to console: {}", e);
        }
        // `ticket` drops here, after the result is out
    });

    Ok(())
}

/// Record a finished resolution as the latest outcome.
///
/// Currency is checked while `last_outcome` is locked, so a request superseded
/// after its call returned can never overwrite a newer outcome.
pub(crate) async fn publish(
    state: &AppState,
    session: &Session,
    ticket: &Ticket,
    request: &TranslationRequest,
    resolution: Result<TranslationResult, TranslationFailure>,
) -> Option<AppEvent> {
    let mut last_outcome = state.last_outcome.write().await;
    if !session.is_current(ticket) {
        tracing::debug!("Request {} superseded before publishing", ticket.id);
        state.stats.write().await.superseded += 1;
        return None;
    }

    *last_outcome = Some(Outcome::from_resolution(&resolution, &request.target_lang));
    drop(last_outcome);

    match resolution {
        Ok(result) => {
            state.stats.write().await.record_success(result.method);
            Some(AppEvent::ShowTranslation {
                ticket: ticket.id,
                result,
                from_lang: request.source_lang.clone(),
                to_lang: request.target_lang.clone(),
            })
        }
        Err(failure) => {
            let kind = failure.kind();
            state.stats.write().await.record_failure(kind);
            (kind != FailureKind::EmptyInput).then(|| AppEvent::ShowFailure {
                ticket: ticket.id,
                kind,
                detail: failure.to_string(),
            })
        }
    }
}

pub fn handle_clear(services: &Services) {
    services.session.clear();
}

#[cfg(test)]
mod tests {
    use parla_config::Config;
    use parla_types::TranslationMethod;

    use super::*;

    fn translated(text: &str) -> Result<TranslationResult, TranslationFailure> {
        Ok(TranslationResult {
            translated_text: text.to_string(),
            method: TranslationMethod::Online,
        })
    }

    #[tokio::test]
    async fn late_result_never_replaces_newer_outcome() {
        let state = AppState::new(Config::default());
        let session = Session::default();
        let request = TranslationRequest::new("uma frase", "pt-BR", "en-US");

        let older = session.issue();
        let newer = session.issue();

        let shown = publish(&state, &session, &newer, &request, translated("newer")).await;
        assert!(matches!(shown, Some(AppEvent::ShowTranslation { .. })));

        // The older call came back after the newer one was published
        let shown = publish(&state, &session, &older, &request, translated("older")).await;
        assert!(shown.is_none());

        let outcome = state.last_outcome.read().await.clone().unwrap();
        assert_eq!(outcome.actionable_text(), Some(("newer", "en-US")));
        assert_eq!(state.stats.read().await.superseded, 1);
        assert_eq!(state.stats.read().await.online_hits, 1);
    }

    #[tokio::test]
    async fn empty_input_updates_outcome_silently() {
        let state = AppState::new(Config::default());
        let session = Session::default();
        let request = TranslationRequest::new(" ", "pt-BR", "en-US");
        let ticket = session.issue();

        let shown = publish(
            &state,
            &session,
            &ticket,
            &request,
            Err(TranslationFailure::EmptyInput),
        )
        .await;

        assert!(shown.is_none());
        assert_eq!(
            *state.last_outcome.read().await,
            Some(Outcome::Failed(FailureKind::EmptyInput))
        );
    }
}
