//! Progress flush controller.
//!
//! Couples a live playback position to the stored progress collection. The
//! controller reads the position through an injected callback at flush time,
//! skips writes the store already has, and guarantees one final forced write
//! when the viewing session ends, however it ends (timer, tab hidden, page
//! unload, pause, explicit stop).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::error::Result;
use crate::facade::DataFacade;
use crate::repo::ProgressWrite;
use crate::types::{ContentId, UserId};

/// Default cadence of the periodic flush driver.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(15);

/// Session lifecycle events that trigger an immediate flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSignal {
    /// The surface went to the background.
    Hidden,
    /// The surface is being torn down.
    Unload,
    /// Playback was paused.
    Pause,
}

/// Callback that reports the current playback position in seconds.
pub type PositionSource = dyn Fn() -> f64 + Send + Sync;

/// Flush controller for one `(user, content)` viewing session.
///
/// Writes go through the facade, so the regression guard and ownership
/// checks apply to every flush exactly as they do to direct writes.
pub struct ProgressTracker {
    facade: Arc<DataFacade>,
    user_id: UserId,
    content_id: ContentId,
    position: Box<PositionSource>,
    last_written: Mutex<Option<f64>>,
    stopped: AtomicBool,
}

impl ProgressTracker {
    /// Create a tracker that reads the live position from `position`.
    pub fn new(
        facade: Arc<DataFacade>,
        user_id: UserId,
        content_id: ContentId,
        position: Box<PositionSource>,
    ) -> Self {
        Self {
            facade,
            user_id,
            content_id,
            position,
            last_written: Mutex::new(None),
            stopped: AtomicBool::new(false),
        }
    }

    /// Whether [`stop`](Self::stop) has run.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Flush the current position to the store.
    ///
    /// Without `force`, a position identical to the last successful write is
    /// skipped (`Ok(None)`), as is any flush after the tracker stopped. A
    /// forced flush always writes, still behind the regression guard.
    ///
    /// # Errors
    ///
    /// Propagates facade failures; a blocked regression is an `Ok` outcome.
    pub fn flush(&self, force: bool) -> Result<Option<ProgressWrite>> {
        if self.is_stopped() && !force {
            return Ok(None);
        }

        let current = (self.position)();
        let mut last = self
            .last_written
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !force
            && let Some(previous) = *last
            && (previous - current).abs() < f64::EPSILON
        {
            return Ok(None);
        }

        let outcome =
            self.facade
                .set_progress(&self.user_id, &self.content_id, current, false)?;
        if matches!(outcome, ProgressWrite::Persisted { .. }) {
            *last = Some(current);
        }
        Ok(Some(outcome))
    }

    /// Handle a session lifecycle event with an immediate (deduplicated)
    /// flush.
    ///
    /// # Errors
    ///
    /// Propagates facade failures.
    pub fn signal(&self, signal: ExitSignal) -> Result<Option<ProgressWrite>> {
        tracing::debug!(user = %self.user_id, content = %self.content_id, ?signal, "exit signal");
        self.flush(false)
    }

    /// Restart playback tracking: write the current position even when it
    /// regresses below the stored value.
    ///
    /// # Errors
    ///
    /// Propagates facade failures.
    pub fn restart(&self) -> Result<ProgressWrite> {
        let current = (self.position)();
        let outcome =
            self.facade
                .set_progress(&self.user_id, &self.content_id, current, true)?;
        *self
            .last_written
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(current);
        Ok(outcome)
    }

    /// End the session with one final forced flush.
    ///
    /// Idempotent: only the first call flushes, every later call is
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Propagates facade failures from the final flush.
    pub fn stop(&self) -> Result<Option<ProgressWrite>> {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }
        self.flush(true)
    }

    /// Drive periodic flushes on a tokio interval until the tracker stops.
    ///
    /// Flush failures are logged and do not end the loop; transient store
    /// trouble must not kill the session.
    pub fn spawn_periodic(self: &Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        let tracker = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // the first tick of a tokio interval fires immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                if tracker.is_stopped() {
                    break;
                }
                if let Err(err) = tracker.flush(false) {
                    tracing::warn!(
                        user = %tracker.user_id,
                        content = %tracker.content_id,
                        %err,
                        "periodic progress flush failed"
                    );
                }
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::identity::StaticIdentity;
    use crate::policy::PolicyContext;
    use crate::store::MemoryStore;

    fn facade() -> Arc<DataFacade> {
        Arc::new(DataFacade::new(
            Arc::new(MemoryStore::new()),
            Arc::new(StaticIdentity::signed_in("user-1")),
            PolicyContext::default(),
        ))
    }

    fn tracker_over(position: Arc<Mutex<f64>>) -> (Arc<DataFacade>, ProgressTracker) {
        let facade = facade();
        let source = Arc::clone(&position);
        let tracker = ProgressTracker::new(
            Arc::clone(&facade),
            UserId::new("user-1"),
            ContentId::new("content-1"),
            Box::new(move || *source.lock().unwrap()),
        );
        (facade, tracker)
    }

    fn stored_seconds(facade: &DataFacade) -> Option<f64> {
        facade
            .get_progress(&UserId::new("user-1"), &ContentId::new("content-1"))
            .unwrap()
            .map(|row| row.progress_seconds)
    }

    #[test]
    fn test_flush_dedupes_unchanged_position() {
        let position = Arc::new(Mutex::new(40.0));
        let (_facade, tracker) = tracker_over(Arc::clone(&position));

        assert!(matches!(
            tracker.flush(false).unwrap(),
            Some(ProgressWrite::Persisted { .. })
        ));
        // same value again: skipped
        assert!(tracker.flush(false).unwrap().is_none());

        *position.lock().unwrap() = 55.0;
        assert!(matches!(
            tracker.flush(false).unwrap(),
            Some(ProgressWrite::Persisted { .. })
        ));
    }

    #[test]
    fn test_forced_flush_writes_unchanged_position() {
        let position = Arc::new(Mutex::new(40.0));
        let (_facade, tracker) = tracker_over(position);

        tracker.flush(false).unwrap();
        assert!(tracker.flush(true).unwrap().is_some());
    }

    #[test]
    fn test_exit_signal_flushes_once() {
        let position = Arc::new(Mutex::new(25.0));
        let (facade, tracker) = tracker_over(position);

        assert!(tracker.signal(ExitSignal::Hidden).unwrap().is_some());
        assert_eq!(stored_seconds(&facade), Some(25.0));
        // hidden then pause at the same position: one write total
        assert!(tracker.signal(ExitSignal::Pause).unwrap().is_none());
    }

    #[test]
    fn test_regression_is_blocked_and_not_remembered() {
        let position = Arc::new(Mutex::new(90.0));
        let (facade, tracker) = tracker_over(Arc::clone(&position));
        tracker.flush(false).unwrap();

        *position.lock().unwrap() = 10.0;
        assert!(matches!(
            tracker.flush(false).unwrap(),
            Some(ProgressWrite::RegressionBlocked { .. })
        ));
        assert_eq!(stored_seconds(&facade), Some(90.0));
    }

    #[test]
    fn test_restart_overrides_regression_guard() {
        let position = Arc::new(Mutex::new(90.0));
        let (facade, tracker) = tracker_over(Arc::clone(&position));
        tracker.flush(false).unwrap();

        *position.lock().unwrap() = 0.0;
        assert!(matches!(
            tracker.restart().unwrap(),
            ProgressWrite::Persisted { .. }
        ));
        assert_eq!(stored_seconds(&facade), Some(0.0));
    }

    #[test]
    fn test_stop_is_idempotent_with_one_final_flush() {
        let position = Arc::new(Mutex::new(40.0));
        let (facade, tracker) = tracker_over(Arc::clone(&position));
        tracker.flush(false).unwrap();

        *position.lock().unwrap() = 62.0;
        assert!(tracker.stop().unwrap().is_some());
        assert_eq!(stored_seconds(&facade), Some(62.0));

        *position.lock().unwrap() = 70.0;
        assert!(tracker.stop().unwrap().is_none());
        assert!(tracker.flush(false).unwrap().is_none());
        assert_eq!(stored_seconds(&facade), Some(62.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_driver_flushes_on_interval() {
        let position = Arc::new(Mutex::new(12.0));
        let (facade, tracker) = tracker_over(Arc::clone(&position));
        let tracker = Arc::new(tracker);

        let handle = tracker.spawn_periodic(DEFAULT_FLUSH_INTERVAL);

        tokio::time::sleep(Duration::from_secs(16)).await;
        assert_eq!(stored_seconds(&facade), Some(12.0));

        *position.lock().unwrap() = 29.0;
        tokio::time::sleep(Duration::from_secs(15)).await;
        assert_eq!(stored_seconds(&facade), Some(29.0));

        tracker.stop().unwrap();
        tokio::time::sleep(Duration::from_secs(16)).await;
        handle.await.unwrap();
    }
}
