use std::sync::Arc;

use parla_io::CapabilityError;
use parla_io::capability::copy_outcome;

use crate::events::Outbox;
use crate::services::Services;
use crate::state::AppState;

pub async fn handle_copy(
    state: Arc<AppState>,
    services: &Services,
    outbox: &Outbox,
) -> anyhow::Result<()> {
    let Some(clipboard) = &services.clipboard else {
        return outbox.status("Clipboard is not available").await;
    };

    let Some(outcome) = state.last_outcome.read().await.clone() else {
        return outbox.status("Nothing to copy yet").await;
    };

    match copy_outcome(clipboard.as_ref(), &outcome) {
        Ok(()) => outbox.status("Copied").await,
        Err(CapabilityError::Refused) => outbox.status("Nothing to copy").await,
        Err(e) => {
            tracing::warn!("Copy failed: {}", e);
            outbox.status(format!("Copy failed: {e}")).await
        }
    }
}
