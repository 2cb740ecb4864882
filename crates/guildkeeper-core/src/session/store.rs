//! TTL-keyed session store over `DashMap`.
//!
//! One in-progress wizard per acting user. Values are cloned on read to
//! avoid holding a `DashMap` `Ref` across `.await` points, which would
//! deadlock. Different actors' entries live in different shards, so one
//! actor's operation never blocks another's.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

use guildkeeper_types::id::UserId;
use guildkeeper_types::session::Session;

/// Concurrent session store with TTL-based expiry.
#[derive(Debug)]
pub struct SessionStore {
    inner: DashMap<UserId, Session>,
    ttl: chrono::Duration,
}

impl SessionStore {
    /// Create a store whose sessions expire after `ttl` of inactivity.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: DashMap::new(),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::minutes(30)),
        }
    }

    /// Insert or unconditionally replace the actor's session.
    ///
    /// A fresh wizard invocation abandons any in-progress one.
    pub fn put(&self, session: Session) {
        self.inner.insert(session.actor_id, session);
    }

    /// Cloned copy of the actor's session, if one exists and is not past
    /// its TTL.
    ///
    /// Absence is a normal outcome (expired or never started), not an
    /// error. A session found past its TTL is removed on the spot rather
    /// than waiting for the next sweep.
    pub fn get(&self, actor_id: UserId) -> Option<Session> {
        // Clone out and drop the shard guard before any removal below
        let session = self.inner.get(&actor_id).map(|entry| entry.value().clone())?;
        if Utc::now() - session.last_touched > self.ttl {
            self.inner.remove(&actor_id);
            return None;
        }
        Some(session)
    }

    /// Remove the actor's session. No-op if absent.
    pub fn remove(&self, actor_id: UserId) {
        self.inner.remove(&actor_id);
    }

    /// Remove every session whose inactivity exceeds the TTL.
    ///
    /// Compares against the last-write timestamp, which every mutation
    /// refreshes, so a session in active use is never swept. Returns the
    /// number of sessions removed.
    pub fn sweep(&self) -> usize {
        let now = Utc::now();
        let before = self.inner.len();
        self.inner.retain(|_, session| now - session.last_touched <= self.ttl);
        let removed = before.saturating_sub(self.inner.len());
        if removed > 0 {
            tracing::debug!(removed, "swept expired wizard sessions");
        }
        removed
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Spawn the periodic sweeper task.
    ///
    /// Runs `sweep` every `interval` until the token is cancelled.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The immediate first tick would sweep an empty store
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!("session sweeper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        store.sweep();
                    }
                }
            }
        })
    }
}
