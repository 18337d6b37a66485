use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Longest stretch `SystemClock::sleep` goes without looking at the cancel flag.
pub const SLEEP_SLICE: Duration = Duration::from_millis(250);

pub trait Clock {
    fn now(&self) -> Instant;
    /// Sleeps for `duration`, returning early once `cancel` is raised.
    fn sleep(&self, duration: Duration, cancel: &AtomicBool);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration, cancel: &AtomicBool) {
        let until = Instant::now() + duration;
        tokio::task::block_in_place(|| loop {
            if cancel.load(Ordering::SeqCst) {
                return;
            }
            let now = Instant::now();
            if now >= until {
                return;
            }
            std::thread::sleep((until - now).min(SLEEP_SLICE));
        });
    }
}

/// Time left until `deadline_ms` (milliseconds since the epoch), minus `margin`.
pub fn time_until_deadline(deadline_ms: u64, margin: Duration) -> Duration {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    let remaining_ms = u128::from(deadline_ms).saturating_sub(now_ms);
    Duration::from_millis(u64::try_from(remaining_ms).unwrap_or(u64::MAX)).saturating_sub(margin)
}

/// Raises `cancel` shortly before the invocation deadline so a blocked wait
/// can still report failure. Abort the handle once the handler returns.
pub fn spawn_deadline_watchdog(
    deadline_ms: u64,
    margin: Duration,
    cancel: Arc<AtomicBool>,
) -> tokio::task::JoinHandle<()> {
    let remaining = time_until_deadline(deadline_ms, margin);
    tokio::spawn(async move {
        tokio::time::sleep(remaining).await;
        cancel.store(true, Ordering::SeqCst);
    })
}
