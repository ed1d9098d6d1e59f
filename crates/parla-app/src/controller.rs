use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use parla_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::console::console_loop;
use crate::events::speech::{SpeechChannel, forward_speech_events};
use crate::events::{Outbox, announce_connectivity, event_loop};
use crate::io::{console_input, watcher_io};
use crate::services::Services;
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            app_to_ui: kanal::bounded_async(capacity),
            ui_to_app: kanal::bounded_async(capacity),
        }
    }

    pub fn outbox(&self) -> Outbox {
        Outbox {
            to_app: self.ui_to_app.0.clone(),
            to_ui: self.app_to_ui.0.clone(),
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>, capacity: usize, cancel_token: CancellationToken) -> Self {
        Self {
            channels: ChannelSet::new(capacity),
            state,
            cancel_token,
        }
    }

    pub fn spawn_tasks(&self, services: Arc<Services>) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            self.state.clone(),
            services.clone(),
            self.channels.ui_to_app.1.clone(),
            self.channels.outbox(),
            self.cancel_token.clone(),
        ));

        // Reachability announcements
        tasks.spawn(announce_connectivity(
            self.state.connectivity.subscribe(),
            self.channels.outbox(),
            self.cancel_token.child_token(),
        ));

        // Speech lifecycle
        let speech_events = [
            (SpeechChannel::Capture, services.capture_events.clone()),
            (SpeechChannel::Playback, services.playback_events.clone()),
        ];
        for (channel, events) in speech_events {
            if let Some(events) = events {
                tasks.spawn(forward_speech_events(
                    channel,
                    events,
                    self.channels.outbox(),
                    self.cancel_token.child_token(),
                ));
            }
        }

        // Console output
        tasks.spawn(console_loop(
            self.channels.app_to_ui.1.clone(),
            self.cancel_token.child_token(),
        ));

        // Console input
        tasks.spawn(console_input(
            self.channels.ui_to_app.0.clone(),
            self.channels.app_to_ui.0.clone(),
            self.cancel_token.child_token(),
        ));

        // Watcher IO
        tasks.spawn(watcher_io(
            self.state.clone(),
            services.clipboard_skip.clone(),
            self.cancel_token.child_token(),
            self.channels.ui_to_app.0.clone(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
