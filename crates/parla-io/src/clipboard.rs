use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use arboard::Clipboard as Arboard;
use tokio::time;

use crate::capability::{CapabilityError, Clipboard};

/// System clipboard through arboard
pub struct SystemClipboard {
    inner: Mutex<Arboard>,
    last_copied: Arc<Mutex<Option<String>>>,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, CapabilityError> {
        let inner = Arboard::new().map_err(|e| CapabilityError::Unavailable(e.to_string()))?;

        Ok(Self {
            inner: Mutex::new(inner),
            last_copied: Arc::new(Mutex::new(None)),
        })
    }

    /// Text this process wrote last, so a clipboard watcher can skip its own copies
    pub fn last_copied(&self) -> Arc<Mutex<Option<String>>> {
        self.last_copied.clone()
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), CapabilityError> {
        lock(&self.inner)
            .set_text(text.to_string())
            .map_err(|e| CapabilityError::Failed(e.to_string()))?;
        *lock(&self.last_copied) = Some(text.to_string());
        tracing::debug!("Copied {} chars to clipboard", text.len());
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Poll the clipboard and hand every new non-empty text to `on_text`.
///
/// Text equal to `skip`'s current value (our own copies) is ignored.
pub async fn watch_clipboard<F>(
    skip: Arc<Mutex<Option<String>>>,
    mut on_text: F,
) -> Result<(), anyhow::Error>
where
    F: FnMut(String) + Send + 'static,
{
    let mut clipboard = Arboard::new()?;
    let mut last_text = String::new();

    let mut interval = time::interval(Duration::from_millis(500));

    loop {
        interval.tick().await;
        if let Ok(text) = clipboard.get_text()
            && !text.trim().is_empty()
            && text != last_text
        {
            last_text = text.clone();
            if lock(&skip).as_deref() == Some(text.as_str()) {
                continue;
            }
            on_text(text);
        }
    }
}
