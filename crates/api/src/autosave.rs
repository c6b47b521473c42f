//! Debounced autosave for strategy notes.
//!
//! Each (race, user) pair has at most one pending draft. Scheduling a new
//! draft replaces the pending one and restarts the quiet period; only the
//! latest draft is written. A pending draft is always cleared by
//! [`NotesAutosave::close`], [`NotesAutosave::cancel`] or
//! [`NotesAutosave::shutdown`], so no timer outlives the editing session
//! that created it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use regatta_core::types::DbId;
use regatta_db::repositories::RaceStrategyRepo;
use regatta_db::DbPool;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Identifies one editing session's notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotesKey {
    pub race_id: DbId,
    pub user_id: DbId,
}

/// Destination for debounced note writes.
#[async_trait]
pub trait NotesWriter: Send + Sync + 'static {
    async fn write_notes(&self, key: NotesKey, notes: Option<&str>) -> Result<(), sqlx::Error>;
}

/// Writes notes to `race_strategies`.
pub struct PgNotesWriter {
    pool: DbPool,
}

impl PgNotesWriter {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotesWriter for PgNotesWriter {
    async fn write_notes(&self, key: NotesKey, notes: Option<&str>) -> Result<(), sqlx::Error> {
        RaceStrategyRepo::upsert_notes(&self.pool, key.race_id, key.user_id, notes).await?;
        Ok(())
    }
}

/// Whitespace-only notes are stored as absent.
pub fn normalize_notes(notes: Option<&str>) -> Option<&str> {
    notes.filter(|n| !n.trim().is_empty())
}

struct PendingDraft {
    generation: u64,
    notes: Option<String>,
    handle: JoinHandle<()>,
}

type WriteLocks = Arc<Mutex<HashMap<NotesKey, Arc<AsyncMutex<()>>>>>;

struct Shared<W> {
    writer: W,
    pending: Mutex<HashMap<NotesKey, PendingDraft>>,
    /// One lock per key with a write in progress or waiting. Every write for
    /// a key happens while holding its lock, so writes land in the order the
    /// lock was taken.
    write_locks: WriteLocks,
}

impl<W> Shared<W> {
    fn pending(&self) -> MutexGuard<'_, HashMap<NotesKey, PendingDraft>> {
        // A panic while holding the lock leaves the map usable.
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn take(&self, key: NotesKey) -> Option<PendingDraft> {
        self.pending().remove(&key)
    }

    fn key_lock(&self, key: NotesKey) -> KeyLock {
        let mut locks = self.write_locks.lock().unwrap_or_else(|p| p.into_inner());
        KeyLock {
            lock: Arc::clone(locks.entry(key).or_default()),
            locks: Arc::clone(&self.write_locks),
            key,
        }
    }
}

/// A handle on one key's write lock. The map entry is removed when the last
/// handle for the key goes away, including from an aborted task.
struct KeyLock {
    lock: Arc<AsyncMutex<()>>,
    locks: WriteLocks,
    key: NotesKey,
}

impl Drop for KeyLock {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(|p| p.into_inner());
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.key);
        }
    }
}

/// Per-key debounce timers for notes drafts.
///
/// Immediate saves go through [`NotesAutosave::save_now`] so a draft that is
/// already being written always lands before them.
pub struct NotesAutosave<W: NotesWriter = PgNotesWriter> {
    shared: Arc<Shared<W>>,
    delay: Duration,
    generation: AtomicU64,
    cancel: CancellationToken,
}

impl<W: NotesWriter> NotesAutosave<W> {
    pub fn new(writer: W, delay: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                writer,
                pending: Mutex::new(HashMap::new()),
                write_locks: Arc::new(Mutex::new(HashMap::new())),
            }),
            delay,
            generation: AtomicU64::new(0),
            cancel: CancellationToken::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `notes` to be written after the quiet period, replacing any
    /// pending draft for the same key.
    pub fn schedule(&self, key: NotesKey, notes: Option<String>) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;

        let mut pending = self.shared.pending();
        let handle = tokio::spawn(fire_after_delay(
            Arc::clone(&self.shared),
            self.cancel.clone(),
            self.delay,
            key,
            generation,
        ));
        let replaced = pending.insert(
            key,
            PendingDraft {
                generation,
                notes,
                handle,
            },
        );
        drop(pending);

        if let Some(old) = replaced {
            old.handle.abort();
        }
        tracing::debug!(
            race_id = key.race_id,
            user_id = key.user_id,
            generation,
            "Notes draft scheduled"
        );
    }

    /// Drop the pending draft for `key` without writing it, then wait for a
    /// draft write already in progress to land.
    ///
    /// Returns `true` if a draft was pending.
    pub async fn cancel(&self, key: NotesKey) -> bool {
        let dropped = self.discard(key);
        let key_lock = self.shared.key_lock(key);
        drop(key_lock.lock.lock().await);
        dropped
    }

    /// End the editing session for `key`: the pending timer is cleared and,
    /// when `flush` is set, the pending draft is written immediately.
    ///
    /// A draft write already in progress lands before this returns.
    /// Returns `true` if a draft was written.
    pub async fn close(&self, key: NotesKey, flush: bool) -> Result<bool, sqlx::Error> {
        let draft = self.shared.take(key);
        if let Some(draft) = &draft {
            draft.handle.abort();
        }

        let key_lock = self.shared.key_lock(key);
        let guard = key_lock.lock.lock().await;
        let result = match draft {
            Some(draft) if flush => self
                .shared
                .writer
                .write_notes(key, normalize_notes(draft.notes.as_deref()))
                .await
                .map(|()| true),
            _ => Ok(false),
        };
        drop(guard);

        if result.as_ref().is_ok_and(|flushed| *flushed) {
            tracing::info!(
                race_id = key.race_id,
                user_id = key.user_id,
                "Notes draft flushed on close"
            );
        }
        result
    }

    /// Run an immediate notes write for `key`.
    ///
    /// The pending draft is dropped, a draft write already in progress lands
    /// first, and no draft can be written while `write` runs.
    pub async fn save_now<T, Fut>(&self, key: NotesKey, write: impl FnOnce() -> Fut) -> T
    where
        Fut: Future<Output = T>,
    {
        if self.discard(key) {
            tracing::debug!(
                race_id = key.race_id,
                user_id = key.user_id,
                "Pending notes draft replaced by save"
            );
        }

        let key_lock = self.shared.key_lock(key);
        let _guard = key_lock.lock.lock().await;
        write().await
    }

    /// Number of drafts waiting for their quiet period to end.
    pub fn pending_count(&self) -> usize {
        self.shared.pending().len()
    }

    /// Clear every pending timer. Drafts that have not fired are discarded.
    pub fn shutdown(&self) -> usize {
        self.cancel.cancel();
        let drained: Vec<PendingDraft> =
            self.shared.pending().drain().map(|(_, d)| d).collect();
        for draft in &drained {
            draft.handle.abort();
        }
        if !drained.is_empty() {
            tracing::warn!(
                discarded = drained.len(),
                "Notes autosave stopped with pending drafts"
            );
        }
        drained.len()
    }

    fn discard(&self, key: NotesKey) -> bool {
        match self.shared.take(key) {
            Some(draft) => {
                draft.handle.abort();
                true
            }
            None => false,
        }
    }
}

async fn fire_after_delay<W: NotesWriter>(
    shared: Arc<Shared<W>>,
    cancel: CancellationToken,
    delay: Duration,
    key: NotesKey,
    generation: u64,
) {
    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(delay) => {}
    }

    let key_lock = shared.key_lock(key);
    let _guard = key_lock.lock.lock().await;

    // Only the latest draft for the key may fire. Taking it out of the map
    // happens under the write lock, so anyone who finds the map empty and
    // then takes the lock waits for this write.
    let notes = {
        let mut map = shared.pending();
        let is_latest = map.get(&key).is_some_and(|d| d.generation == generation);
        if is_latest {
            map.remove(&key).map(|d| d.notes)
        } else {
            None
        }
    };

    if let Some(notes) = notes {
        match shared
            .writer
            .write_notes(key, normalize_notes(notes.as_deref()))
            .await
        {
            Ok(()) => {
                tracing::debug!(race_id = key.race_id, user_id = key.user_id, "Notes draft saved");
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    race_id = key.race_id,
                    user_id = key.user_id,
                    "Notes autosave failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingWriter {
        /// How long each write takes before it is recorded.
        latency: Duration,
        writes: Mutex<Vec<(NotesKey, Option<String>)>>,
    }

    impl RecordingWriter {
        async fn record(&self, key: NotesKey, notes: Option<&str>) {
            tokio::time::sleep(self.latency).await;
            self.writes
                .lock()
                .unwrap()
                .push((key, notes.map(str::to_string)));
        }
    }

    #[async_trait]
    impl NotesWriter for Arc<RecordingWriter> {
        async fn write_notes(
            &self,
            key: NotesKey,
            notes: Option<&str>,
        ) -> Result<(), sqlx::Error> {
            self.record(key, notes).await;
            Ok(())
        }
    }

    const KEY: NotesKey = NotesKey {
        race_id: 7,
        user_id: 3,
    };

    fn autosave(delay_ms: u64) -> (NotesAutosave<Arc<RecordingWriter>>, Arc<RecordingWriter>) {
        slow_autosave(delay_ms, 0)
    }

    fn slow_autosave(
        delay_ms: u64,
        latency_ms: u64,
    ) -> (NotesAutosave<Arc<RecordingWriter>>, Arc<RecordingWriter>) {
        let writer = Arc::new(RecordingWriter {
            latency: Duration::from_millis(latency_ms),
            ..Default::default()
        });
        (
            NotesAutosave::new(Arc::clone(&writer), Duration::from_millis(delay_ms)),
            writer,
        )
    }

    fn writes(writer: &RecordingWriter) -> Vec<(NotesKey, Option<String>)> {
        writer.writes.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn only_latest_draft_is_written() {
        let (autosave, writer) = autosave(50);
        autosave.schedule(KEY, Some("a".into()));
        autosave.schedule(KEY, Some("ab".into()));
        autosave.schedule(KEY, Some("abc".into()));
        assert_eq!(autosave.pending_count(), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(writes(&writer), vec![(KEY, Some("abc".to_string()))]);
        assert_eq!(autosave.pending_count(), 0);
    }

    #[tokio::test]
    async fn close_without_flush_discards_draft() {
        let (autosave, writer) = autosave(50);
        autosave.schedule(KEY, Some("draft".into()));

        assert!(!autosave.close(KEY, false).await.unwrap());
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(writes(&writer).is_empty());
        assert_eq!(autosave.pending_count(), 0);
    }

    #[tokio::test]
    async fn close_with_flush_writes_immediately_once() {
        let (autosave, writer) = autosave(50);
        autosave.schedule(KEY, Some("draft".into()));

        assert!(autosave.close(KEY, true).await.unwrap());
        assert_eq!(writes(&writer).len(), 1);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(writes(&writer).len(), 1);
    }

    #[tokio::test]
    async fn close_with_nothing_pending_is_noop() {
        let (autosave, writer) = autosave(50);
        assert!(!autosave.close(KEY, true).await.unwrap());
        assert!(writes(&writer).is_empty());
    }

    #[tokio::test]
    async fn cancel_drops_pending_draft() {
        let (autosave, writer) = autosave(50);
        autosave.schedule(KEY, Some("draft".into()));
        assert!(autosave.cancel(KEY).await);
        assert!(!autosave.cancel(KEY).await);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(writes(&writer).is_empty());
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let (autosave, writer) = autosave(50);
        let other = NotesKey {
            race_id: 8,
            user_id: 3,
        };
        autosave.schedule(KEY, Some("one".into()));
        autosave.schedule(other, Some("two".into()));
        autosave.cancel(KEY).await;

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(writes(&writer), vec![(other, Some("two".to_string()))]);
    }

    #[tokio::test]
    async fn shutdown_clears_all_timers() {
        let (autosave, writer) = autosave(50);
        autosave.schedule(KEY, Some("one".into()));
        autosave.schedule(
            NotesKey {
                race_id: 9,
                user_id: 4,
            },
            Some("two".into()),
        );

        assert_eq!(autosave.shutdown(), 2);
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(writes(&writer).is_empty());
        assert_eq!(autosave.pending_count(), 0);
    }

    #[tokio::test]
    async fn blank_draft_is_stored_as_absent() {
        let (autosave, writer) = autosave(10);
        autosave.schedule(KEY, Some("   ".into()));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(writes(&writer), vec![(KEY, None)]);
    }

    #[tokio::test]
    async fn explicit_save_lands_after_in_flight_draft() {
        let (autosave, writer) = slow_autosave(10, 100);
        autosave.schedule(KEY, Some("old draft".into()));

        // The draft has fired and its write is still running.
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(autosave.pending_count(), 0);

        autosave
            .save_now(KEY, || writer.record(KEY, Some("explicit save")))
            .await;
        assert!(!autosave.close(KEY, false).await.unwrap());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(
            writes(&writer),
            vec![
                (KEY, Some("old draft".to_string())),
                (KEY, Some("explicit save".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn cancel_waits_for_in_flight_draft() {
        let (autosave, writer) = slow_autosave(10, 100);
        autosave.schedule(KEY, Some("old draft".into()));
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(!autosave.cancel(KEY).await);
        assert_eq!(writes(&writer), vec![(KEY, Some("old draft".to_string()))]);
    }

    #[tokio::test]
    async fn save_now_discards_pending_draft() {
        let (autosave, writer) = autosave(50);
        autosave.schedule(KEY, Some("draft".into()));

        autosave
            .save_now(KEY, || writer.record(KEY, Some("saved")))
            .await;
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(writes(&writer), vec![(KEY, Some("saved".to_string()))]);
        assert_eq!(autosave.pending_count(), 0);
    }

    #[tokio::test]
    async fn write_locks_are_released() {
        let (autosave, _writer) = slow_autosave(10, 20);
        autosave.schedule(KEY, Some("draft".into()));
        tokio::time::sleep(Duration::from_millis(100)).await;
        autosave.cancel(KEY).await;

        assert!(autosave.shared.write_locks.lock().unwrap().is_empty());
    }
}
