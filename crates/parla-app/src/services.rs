use std::sync::{Arc, Mutex};
use std::time::Duration;

use parla_config::Config;
use parla_core::{Connectivity, OfflineResolver, Orchestrator, Session};
use parla_dictionary::PhrasebookLoader;
use kanal::AsyncReceiver;
use parla_io::{
    Clipboard, CommandCapture, CommandPlayback, SpeechCapture, SpeechEvent, SpeechPlayback,
    SystemClipboard,
};
use parla_translator::MyMemoryTranslator;
use tokio_util::sync::CancellationToken;

/// Everything the event handlers call into
pub struct Services {
    pub orchestrator: Arc<Orchestrator>,
    pub session: Arc<Session>,
    pub clipboard: Option<Arc<dyn Clipboard>>,
    pub capture: Option<Arc<dyn SpeechCapture>>,
    pub playback: Option<Arc<dyn SpeechPlayback>>,
    /// Last text we copied, hidden from the clipboard watcher
    pub clipboard_skip: Arc<Mutex<Option<String>>>,
    pub capture_events: Option<AsyncReceiver<SpeechEvent>>,
    pub playback_events: Option<AsyncReceiver<SpeechEvent>>,
}

impl Services {
    pub fn new(orchestrator: Orchestrator, cancel: &CancellationToken) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            session: Arc::new(Session::new(cancel.child_token())),
            clipboard: None,
            capture: None,
            playback: None,
            clipboard_skip: Arc::new(Mutex::new(None)),
            capture_events: None,
            playback_events: None,
        }
    }

    pub fn from_config(
        config: &Config,
        connectivity: Connectivity,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Self> {
        let orchestrator = build_orchestrator(config, connectivity)?;
        let mut services = Self::new(orchestrator, cancel);

        match SystemClipboard::new() {
            Ok(clipboard) => {
                services.clipboard_skip = clipboard.last_copied();
                services.clipboard = Some(Arc::new(clipboard));
            }
            Err(e) => tracing::warn!("Clipboard unavailable: {}", e),
        }

        if let Some(command) = config.speech.capture_command.clone() {
            match CommandCapture::new(command) {
                Ok(capture) => {
                    let (events_tx, events_rx) = kanal::unbounded_async();
                    services.capture = Some(Arc::new(capture.with_events(events_tx)));
                    services.capture_events = Some(events_rx);
                }
                Err(e) => tracing::warn!("Speech capture disabled: {}", e),
            }
        }

        if let Some(command) = config.speech.playback_command.clone() {
            match CommandPlayback::new(command) {
                Ok(playback) => {
                    let (events_tx, events_rx) = kanal::unbounded_async();
                    services.playback = Some(Arc::new(playback.with_events(events_tx)));
                    services.playback_events = Some(events_rx);
                }
                Err(e) => tracing::warn!("Speech playback disabled: {}", e),
            }
        }

        Ok(services)
    }
}

pub fn build_orchestrator(
    config: &Config,
    connectivity: Connectivity,
) -> anyhow::Result<Orchestrator> {
    let phrasebook = PhrasebookLoader::load_all(
        config.dictionary.embedded,
        &config.dictionary.additional_paths,
    );
    let resolver = OfflineResolver::new(Arc::new(phrasebook));
    let meta = resolver.metadata();
    tracing::info!(
        "Offline dictionary '{}': {} entries in {} pairs",
        meta.name,
        meta.entry_count,
        meta.pair_count
    );

    let mut orchestrator = Orchestrator::new(resolver, connectivity);

    let translator_config = &config.translator;
    if translator_config.enabled {
        if translator_config.provider != "mymemory" {
            anyhow::bail!("Unknown translation provider: {}", translator_config.provider);
        }

        let translator = if translator_config.timeout_ms > 0 {
            let limit = Duration::from_millis(translator_config.timeout_ms);
            orchestrator = orchestrator.with_timeout(limit);
            MyMemoryTranslator::with_timeout(translator_config.api_url.clone(), limit)?
        } else {
            MyMemoryTranslator::new(translator_config.api_url.clone())
        };

        orchestrator = orchestrator
            .with_translator(Arc::new(translator.with_email(translator_config.email.clone())));
        tracing::info!("Online fallback: {}", translator_config.api_url);
    } else {
        tracing::info!("Online fallback disabled");
    }

    Ok(orchestrator)
}
