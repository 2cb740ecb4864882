//! Debounced push scheduler with throttle backoff.
//!
//! Commits signal `notify_changed`; the scheduler coalesces those signals
//! into rate-limited full-roster pushes. State (`last_push_at`, the current
//! interval, the single pending-timer slot) is owned by one background
//! task fed through a capacity-1 channel, so concurrent notifies from
//! different members' commits can neither race two pushes into flight nor
//! silently drop one.
//!
//! Policy:
//! - elapsed since last push >= interval: push immediately;
//! - otherwise one trailing push after `interval - elapsed`; signals
//!   arriving during the wait are absorbed (last-write-wins coalescing,
//!   not a queue) -- the eventual push carries the then-current data set;
//! - a throttled or timed-out push doubles the interval (capped) and is
//!   retried on the next window; success leaves the interval unchanged.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use guildkeeper_types::config::SyncConfig;
use guildkeeper_types::error::PushError;

use crate::repository::CharacterRepository;
use crate::sync::publisher::SheetPublisher;

/// Cheap cloneable handle for signaling "the roster changed".
#[derive(Debug, Clone)]
pub struct SyncNotifier {
    tx: mpsc::Sender<()>,
}

impl SyncNotifier {
    pub fn new(tx: mpsc::Sender<()>) -> Self {
        Self { tx }
    }

    /// Signal that the committed data set changed.
    ///
    /// Never blocks and never fails: a full channel means a push is
    /// already due, and the pending one will carry this change too.
    pub fn notify_changed(&self) {
        match self.tx.try_send(()) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(())) => {
                // Absorbed into the already-pending push
            }
            Err(mpsc::error::TrySendError::Closed(())) => {
                tracing::warn!("sync scheduler is gone, change signal dropped");
            }
        }
    }
}

/// The running scheduler: a notifier plus the background task handle.
pub struct SyncScheduler {
    notifier: SyncNotifier,
    handle: tokio::task::JoinHandle<()>,
}

impl SyncScheduler {
    /// Spawn the scheduler task.
    ///
    /// Runs until `cancel` fires or every notifier is dropped.
    pub fn spawn<R, P>(
        repository: Arc<R>,
        publisher: Arc<P>,
        config: SyncConfig,
        cancel: CancellationToken,
    ) -> Self
    where
        R: CharacterRepository + 'static,
        P: SheetPublisher + 'static,
    {
        let (tx, rx) = mpsc::channel(1);
        let notifier = SyncNotifier::new(tx);
        let handle = tokio::spawn(run(repository, publisher, config, cancel, rx));
        Self { notifier, handle }
    }

    /// A handle commits use to signal changes.
    pub fn notifier(&self) -> SyncNotifier {
        self.notifier.clone()
    }

    /// Wait for the task to finish (after cancellation).
    pub async fn join(self) {
        drop(self.notifier);
        let _ = self.handle.await;
    }
}

async fn run<R, P>(
    repository: Arc<R>,
    publisher: Arc<P>,
    config: SyncConfig,
    cancel: CancellationToken,
    mut rx: mpsc::Receiver<()>,
) where
    R: CharacterRepository,
    P: SheetPublisher,
{
    let min_interval = Duration::from_secs(config.min_interval_secs);
    let max_interval = Duration::from_secs(config.max_interval_secs);
    let push_timeout = Duration::from_secs(config.push_timeout_secs);

    let mut interval = min_interval;
    let mut last_push_at: Option<Instant> = None;
    // Set after a failed push so the retry does not need a fresh signal
    let mut pending = false;

    loop {
        if !pending {
            tokio::select! {
                _ = cancel.cancelled() => break,
                received = rx.recv() => match received {
                    Some(()) => {}
                    None => break,
                },
            }
        }

        // Rate limit: wait out the remainder of the current window
        if let Some(last) = last_push_at {
            let elapsed = last.elapsed();
            if elapsed < interval {
                let wait = interval - elapsed;
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(wait) => {}
                }
            }
        }

        // Absorb everything that accumulated while waiting: the push below
        // reads current storage, so it already reflects those commits
        while rx.try_recv().is_ok() {}
        pending = false;
        last_push_at = Some(Instant::now());

        match push_once(&*repository, &*publisher, push_timeout).await {
            Ok(rows) => {
                tracing::debug!(rows, "roster pushed to external sheet");
            }
            Err(PushError::Throttled) | Err(PushError::Timeout) => {
                interval = (interval * 2).min(max_interval);
                pending = true;
                tracing::warn!(
                    next_interval_secs = interval.as_secs(),
                    "roster push throttled, backing off"
                );
            }
            Err(PushError::Failed(message)) => {
                pending = true;
                tracing::warn!(error = %message, "roster push failed, retrying next window");
            }
        }
    }

    tracing::debug!("sync scheduler stopped");
}

/// One full-dataset push, bounded by `timeout`.
async fn push_once<R, P>(
    repository: &R,
    publisher: &P,
    timeout: Duration,
) -> Result<usize, PushError>
where
    R: CharacterRepository,
    P: SheetPublisher,
{
    let rows = repository
        .fetch_all_with_timezones()
        .await
        .map_err(|e| PushError::Failed(e.to_string()))?;

    match tokio::time::timeout(timeout, publisher.replace_all(&rows)).await {
        Ok(Ok(())) => Ok(rows.len()),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(PushError::Timeout),
    }
}
