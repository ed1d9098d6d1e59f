use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

/// Last reported network reachability.
///
/// Cloning shares the same state. Reads never lock; `set_online` is the only
/// way to change the value and is driven by reachability notifications.
#[derive(Clone)]
pub struct Connectivity {
    inner: Arc<ConnectivityInner>,
}

struct ConnectivityInner {
    online: AtomicBool,
    changes: watch::Sender<bool>,
}

impl Connectivity {
    pub fn new(initially_online: bool) -> Self {
        let (changes, _) = watch::channel(initially_online);

        Self {
            inner: Arc::new(ConnectivityInner {
                online: AtomicBool::new(initially_online),
                changes,
            }),
        }
    }

    pub fn is_online(&self) -> bool {
        self.inner.online.load(Ordering::Acquire)
    }

    /// Record a "became reachable" / "became unreachable" notification.
    ///
    /// Returns true when the value changed. The flag and the watch value are
    /// updated under the watch lock, so concurrent writers never leave them apart.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.inner.changes.send_if_modified(|value| {
            if *value == online {
                return false;
            }
            *value = online;
            self.inner.online.store(online, Ordering::Release);
            true
        });

        if changed {
            tracing::info!(
                "Connectivity changed: {}",
                if online { "online" } else { "offline" }
            );
        }
        changed
    }

    /// Receiver that wakes on every change
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.changes.subscribe()
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    #[test]
    fn clones_share_state() {
        let connectivity = Connectivity::new(true);
        let reader = connectivity.clone();

        assert!(reader.is_online());
        assert!(connectivity.set_online(false));
        assert!(!reader.is_online());
    }

    #[test]
    fn repeated_notification_is_not_a_change() {
        let connectivity = Connectivity::new(false);
        assert!(!connectivity.set_online(false));
        assert!(connectivity.set_online(true));
        assert!(!connectivity.set_online(true));
    }

    #[test]
    fn concurrent_writers_keep_flag_and_watch_in_step() {
        let connectivity = Connectivity::new(true);
        let rx = connectivity.subscribe();

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let connectivity = &connectivity;
                scope.spawn(move || {
                    for i in 0..500 {
                        connectivity.set_online((i + worker) % 2 == 0);
                    }
                });
            }
        });

        assert_eq!(connectivity.is_online(), *rx.borrow());
    }

    #[tokio::test]
    async fn subscribers_see_latest_value() {
        let connectivity = Connectivity::new(true);
        let mut rx = connectivity.subscribe();

        connectivity.set_online(false);

        timeout(Duration::from_secs(1), rx.changed())
            .await
            .expect("no change observed")
            .unwrap();
        assert!(!*rx.borrow());
    }
}
