use std::sync::Arc;

use parla_core::language;
use parla_types::AppEvent;

use crate::events::Outbox;
use crate::state::AppState;

/// Swap source and target, then re-issue the last translation as new input
pub async fn handle_swap(state: Arc<AppState>, outbox: &Outbox) -> anyhow::Result<()> {
    let pair = {
        let mut languages = state.languages.write().await;
        *languages = languages.swapped();
        languages.clone()
    };
    outbox
        .status(format!("{} → {}", pair.source, pair.target))
        .await?;

    let previous_output = state
        .last_outcome
        .read()
        .await
        .as_ref()
        .and_then(|outcome| outcome.actionable_text().map(|(text, _)| text.to_string()));

    if let Some(text) = previous_output {
        outbox.to_app.send(AppEvent::TextInput(text)).await?;
    }

    Ok(())
}

/// Change one side of the pair; unknown codes are rejected
pub async fn handle_language_change(
    state: Arc<AppState>,
    code: String,
    source: bool,
    outbox: &Outbox,
) -> anyhow::Result<()> {
    let Some(entry) = language::find(&code) else {
        tracing::warn!("Rejected unknown language code: {}", code);
        return outbox
            .status(format!("Unknown language: {code} (see :langs)"))
            .await;
    };

    let pair = {
        let mut languages = state.languages.write().await;
        if source {
            languages.source = entry.code.to_string();
        } else {
            languages.target = entry.code.to_string();
        }
        languages.clone()
    };

    outbox
        .status(format!("{} → {}", pair.source, pair.target))
        .await
}

pub async fn handle_list_languages(outbox: &Outbox) -> anyhow::Result<()> {
    for entry in language::list_languages() {
        outbox
            .status(format!("{} {:<6} {}", entry.flag, entry.code, entry.name))
            .await?;
    }
    Ok(())
}
