use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Last-request-wins ordering for one logical input session.
///
/// Every request takes a [`Ticket`]; issuing a newer one cancels the older.
/// Results are only accepted for the most recently issued ticket, whatever
/// order the calls complete in.
pub struct Session {
    latest: AtomicU64,
    current: Mutex<CancellationToken>,
    parent: CancellationToken,
    /// Number of tickets not yet dropped
    in_flight: Arc<watch::Sender<usize>>,
}

/// A request's claim on the session; held until its result is published
pub struct Ticket {
    pub id: u64,
    token: CancellationToken,
    in_flight: Arc<watch::Sender<usize>>,
}

impl Ticket {
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.in_flight
            .send_modify(|count| *count = count.saturating_sub(1));
    }
}

impl Session {
    pub fn new(parent: CancellationToken) -> Self {
        let current = parent.child_token();
        let (in_flight, _) = watch::channel(0);
        Self {
            latest: AtomicU64::new(0),
            current: Mutex::new(current),
            parent,
            in_flight: Arc::new(in_flight),
        }
    }

    /// Start a new request, superseding whatever is in flight
    pub fn issue(&self) -> Ticket {
        let mut current = self.lock_current();
        let token = self.parent.child_token();
        std::mem::replace(&mut *current, token.clone()).cancel();

        let id = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        self.in_flight.send_modify(|count| *count += 1);

        Ticket {
            id,
            token,
            in_flight: self.in_flight.clone(),
        }
    }

    /// Abandon the in-flight request, if any
    pub fn clear(&self) {
        let mut current = self.lock_current();
        self.latest.fetch_add(1, Ordering::AcqRel);
        std::mem::replace(&mut *current, self.parent.child_token()).cancel();
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        !ticket.is_cancelled() && self.latest.load(Ordering::Acquire) == ticket.id
    }

    /// Tickets issued and not yet dropped
    pub fn in_flight(&self) -> usize {
        *self.in_flight.borrow()
    }

    /// Wait until every issued ticket has been dropped
    pub async fn idle(&self) {
        let mut rx = self.in_flight.subscribe();
        // The sender lives as long as `self`, so this never errors here
        let _ = rx.wait_for(|count| *count == 0).await;
    }

    /// Drive `work` for `ticket`, yielding `None` when the ticket is superseded
    /// before or after the work completes
    pub async fn run<F, T>(&self, ticket: &Ticket, work: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let output = tokio::select! {
            _ = ticket.token.cancelled() => {
                tracing::debug!("Request {} abandoned", ticket.id);
                return None;
            }
            output = work => output,
        };

        if self.is_current(ticket) {
            Some(output)
        } else {
            tracing::debug!("Discarding stale result for request {}", ticket.id);
            None
        }
    }

    fn lock_current(&self) -> MutexGuard<'_, CancellationToken> {
        match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(CancellationToken::new())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test]
    async fn newer_request_cancels_older() {
        let session = Arc::new(Session::default());

        let (slow_tx, slow_rx) = oneshot::channel::<&str>();
        let first = session.issue();
        let s = session.clone();
        let pending = tokio::spawn(async move { s.run(&first, async { slow_rx.await }).await });

        tokio::task::yield_now().await;
        let second = session.issue();
        let fast = session.run(&second, async { "second" }).await;

        assert_eq!(fast, Some("second"));
        assert_eq!(pending.await.unwrap(), None);
        // the abandoned call's sender is simply dropped
        drop(slow_tx);
    }

    #[tokio::test]
    async fn stale_completion_is_discarded() {
        let session = Session::default();

        let first = session.issue();
        let second = session.issue();

        assert!(!session.is_current(&first));
        assert!(session.is_current(&second));
        assert_eq!(session.run(&first, async { 1 }).await, None);
        assert_eq!(session.run(&second, async { 2 }).await, Some(2));
    }

    #[tokio::test]
    async fn clear_abandons_in_flight_request() {
        let session = Arc::new(Session::default());
        let ticket = session.issue();

        let s = session.clone();
        let handle = tokio::spawn(async move {
            s.run(&ticket, tokio::time::sleep(Duration::from_secs(30)))
                .await
        });

        tokio::task::yield_now().await;
        session.clear();

        let result = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("abandoned request kept running")
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn parent_cancellation_stops_everything() {
        let parent = CancellationToken::new();
        let session = Session::new(parent.clone());
        let ticket = session.issue();

        parent.cancel();

        assert!(ticket.is_cancelled());
        assert_eq!(
            session.run(&ticket, std::future::pending::<()>()).await,
            None
        );
    }

    #[test]
    fn concurrent_issuers_leave_exactly_one_current() {
        let session = Session::default();

        let tickets: Vec<Ticket> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| (0..200).map(|_| session.issue()).collect::<Vec<_>>()))
                .collect();
            workers
                .into_iter()
                .flat_map(|worker| worker.join().unwrap())
                .collect()
        });

        let current = tickets.iter().filter(|t| session.is_current(t)).count();
        assert_eq!(current, 1);
        assert_eq!(session.in_flight(), tickets.len());
    }

    #[tokio::test]
    async fn idle_waits_for_outstanding_tickets() {
        let session = Arc::new(Session::default());
        let first = session.issue();
        let second = session.issue();
        assert_eq!(session.in_flight(), 2);

        let waiter = {
            let session = session.clone();
            tokio::spawn(async move { session.idle().await })
        };

        drop(first);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(second);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("idle never resolved")
            .unwrap();
        assert_eq!(session.in_flight(), 0);
    }

    #[test]
    fn ticket_ids_increase() {
        let session = Session::default();
        let a = session.issue();
        let b = session.issue();
        assert!(b.id > a.id);
    }
}
