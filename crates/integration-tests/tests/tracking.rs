//! The flush controller driven over the facade, with paused tokio time.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use homehaven_core::tracking::{DEFAULT_FLUSH_INTERVAL, ExitSignal, ProgressTracker};
use homehaven_core::types::ContentId;

use homehaven_integration_tests::TestContext;

#[tokio::test(start_paused = true)]
async fn test_viewing_session_lifecycle() {
    let ctx = TestContext::signed_in("user-1").await;
    let content = ContentId::new("content-jollof");

    let position = Arc::new(Mutex::new(0.0_f64));
    let source = Arc::clone(&position);
    let tracker = Arc::new(ProgressTracker::new(
        Arc::clone(&ctx.facade),
        ctx.user.clone(),
        content.clone(),
        Box::new(move || *source.lock().unwrap()),
    ));
    let handle = tracker.spawn_periodic(DEFAULT_FLUSH_INTERVAL);

    // playback advances; the interval picks it up
    *position.lock().unwrap() = 20.0;
    tokio::time::sleep(Duration::from_secs(16)).await;
    let stored = ctx.facade.get_progress(&ctx.user, &content).unwrap().unwrap();
    assert_eq!(stored.progress_seconds, 20.0);

    // tab hidden mid-interval: flushed immediately
    *position.lock().unwrap() = 27.0;
    tracker.signal(ExitSignal::Hidden).unwrap();
    let stored = ctx.facade.get_progress(&ctx.user, &content).unwrap().unwrap();
    assert_eq!(stored.progress_seconds, 27.0);

    // session ends: one final forced flush, then the driver exits
    *position.lock().unwrap() = 33.0;
    tracker.stop().unwrap();
    let stored = ctx.facade.get_progress(&ctx.user, &content).unwrap().unwrap();
    assert_eq!(stored.progress_seconds, 33.0);

    tokio::time::sleep(Duration::from_secs(16)).await;
    handle.await.unwrap();

    // later writes through the stopped tracker are ignored
    *position.lock().unwrap() = 99.0;
    assert!(tracker.flush(false).unwrap().is_none());
    let stored = ctx.facade.get_progress(&ctx.user, &content).unwrap().unwrap();
    assert_eq!(stored.progress_seconds, 33.0);
}
