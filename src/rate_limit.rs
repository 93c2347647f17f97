//! Per-client rate limiting with fixed-window counters.
//!
//! Each logical key (typically `"<form>:<client>"`) gets an independent
//! counter that resets when its window elapses. Fixed windows trade precision
//! for simplicity: a client can burst up to twice the limit across a window
//! boundary. That is accepted for an anti-abuse guard in front of mail
//! dispatch; callers wanting stricter admission would need a sliding window
//! behind the same [`RateLimiter::check`] signature.
//!
//! Counters live in process memory only. A restart resets all quotas.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Time source for window arithmetic. Injectable so tests can advance time
/// deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time via [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Admission quota for one call site: at most `limit` requests per `window`.
///
/// Quotas are passed per call, not stored in the limiter, so different
/// endpoints can throttle the same client independently.
#[derive(Debug, Clone, Copy)]
pub struct Quota {
    limit: u32,
    window: Duration,
}

impl Quota {
    /// Creates a quota.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero or `window` is zero. A zeroed quota is a
    /// misconfigured endpoint, and silently substituting a default would hide
    /// that, so construction fails loudly instead.
    pub fn new(limit: u32, window: Duration) -> Self {
        assert!(limit > 0, "quota limit must admit at least one request");
        assert!(!window.is_zero(), "quota window must be non-zero");
        Self { limit, window }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Outcome of a [`RateLimiter::check`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request was admitted.
    pub allowed: bool,
    /// Quota left in the current window. Zero when denied.
    pub remaining: u32,
    /// Whole seconds (rounded up) until the current window resets.
    /// Informational when admitted, actionable when denied.
    pub retry_after_secs: u64,
}

struct Entry {
    count: u32,
    window_end: Instant,
}

/// In-memory fixed-window rate limiter keyed by caller-composed strings.
///
/// Cheap to clone; all clones share one counter table. The table is the only
/// shared mutable state, and the per-key read-modify-write happens under the
/// DashMap entry lock, so two concurrent requests at the quota boundary can
/// never both be admitted.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<RateLimiterInner>,
}

struct RateLimiterInner {
    counters: DashMap<String, Entry>,
    clock: Box<dyn Clock>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    /// Creates a limiter backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Creates a limiter with a custom time source (tests).
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            inner: Arc::new(RateLimiterInner {
                counters: DashMap::new(),
                clock: Box::new(clock),
            }),
        }
    }

    /// Decides whether one more request under `key` fits in `quota`.
    ///
    /// Admission increments the key's counter (creating it with a fresh
    /// window if absent or expired). Denial mutates nothing, so a throttled
    /// client probing again neither extends its window nor loses quota it
    /// never had.
    pub fn check(&self, key: &str, quota: Quota) -> Decision {
        let now = self.inner.clock.now();

        let mut entry = self
            .inner
            .counters
            .entry(key.to_string())
            .or_insert_with(|| Entry {
                count: 0,
                window_end: now + quota.window,
            });

        if now >= entry.window_end {
            // Window elapsed — same as absent
            entry.count = 0;
            entry.window_end = now + quota.window;
        }

        let retry_after_secs = secs_until(entry.window_end, now);

        if entry.count >= quota.limit {
            return Decision {
                allowed: false,
                remaining: 0,
                retry_after_secs,
            };
        }

        entry.count += 1;
        Decision {
            allowed: true,
            remaining: quota.limit - entry.count,
            retry_after_secs,
        }
    }

    /// Removes entries whose window has passed. Returns the count removed.
    ///
    /// Purely a memory bound for long-running processes with many distinct
    /// clients; `check` already treats expired entries as absent. Racing a
    /// concurrent `check` is harmless: at worst the caller gets a fresh
    /// window, within fixed-window imprecision.
    pub fn sweep(&self) -> usize {
        let now = self.inner.clock.now();
        let before = self.inner.counters.len();
        self.inner.counters.retain(|_, entry| entry.window_end > now);
        before.saturating_sub(self.inner.counters.len())
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.inner.counters.len()
    }
}

fn secs_until(window_end: Instant, now: Instant) -> u64 {
    let left = window_end.saturating_duration_since(now);
    let secs = left.as_secs();
    if left.subsec_nanos() > 0 { secs + 1 } else { secs }
}

// ---------------------------------------------------------------------------
// Background sweep task
// ---------------------------------------------------------------------------

/// Handle to the periodic sweep task. Aborting it stops the sweep; the
/// limiter itself keeps working (entries just stop being reclaimed).
pub struct SweeperHandle {
    task: tokio::task::JoinHandle<()>,
}

impl SweeperHandle {
    /// Stops the sweep task.
    pub fn stop(&self) {
        self.task.abort();
    }
}

/// Spawns a task that sweeps expired entries every `interval`.
pub fn spawn_sweeper(limiter: RateLimiter, interval: Duration) -> SweeperHandle {
    let task = tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let removed = limiter.sweep();
            if removed > 0 {
                tracing::debug!(removed, "swept expired rate-limit entries");
            }
        }
    });
    SweeperHandle { task }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    use super::*;

    /// Test clock advanced by hand, in milliseconds past a fixed origin.
    #[derive(Clone)]
    struct ManualClock {
        origin: Instant,
        offset_ms: Arc<AtomicU64>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                origin: Instant::now(),
                offset_ms: Arc::new(AtomicU64::new(0)),
            }
        }

        fn advance(&self, by: Duration) {
            self.offset_ms
                .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.origin + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
        }
    }

    fn quota(limit: u32, window_secs: u64) -> Quota {
        Quota::new(limit, Duration::from_secs(window_secs))
    }

    #[test]
    fn admits_up_to_limit_then_denies() {
        let limiter = RateLimiter::new();
        let q = quota(5, 60);

        for expected_remaining in (0..5).rev() {
            let d = limiter.check("contact:9.9.9.9", q);
            assert!(d.allowed);
            assert_eq!(d.remaining, expected_remaining);
            assert!(d.retry_after_secs <= 60);
        }

        let d = limiter.check("contact:9.9.9.9", q);
        assert!(!d.allowed);
        assert_eq!(d.remaining, 0);
        assert!(d.retry_after_secs > 0 && d.retry_after_secs <= 60);
    }

    #[test]
    fn window_reset_restores_full_quota() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock(clock.clone());
        let q = quota(5, 60);

        for _ in 0..5 {
            assert!(limiter.check("contact:9.9.9.9", q).allowed);
        }
        assert!(!limiter.check("contact:9.9.9.9", q).allowed);

        clock.advance(Duration::from_secs(61));

        let d = limiter.check("contact:9.9.9.9", q);
        assert!(d.allowed);
        assert_eq!(d.remaining, 4);
        assert_eq!(d.retry_after_secs, 60);
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::new();
        let q = quota(2, 60);

        assert!(limiter.check("contact:1.2.3.4", q).allowed);
        assert!(limiter.check("contact:1.2.3.4", q).allowed);
        assert!(!limiter.check("contact:1.2.3.4", q).allowed);

        // Same client, different form: untouched quota
        let d = limiter.check("careers:1.2.3.4", q);
        assert!(d.allowed);
        assert_eq!(d.remaining, 1);
    }

    #[test]
    fn denial_is_idempotent_and_retry_after_shrinks() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock(clock.clone());
        let q = quota(1, 30);

        assert!(limiter.check("contact:k", q).allowed);

        let first = limiter.check("contact:k", q);
        assert!(!first.allowed);
        assert_eq!(first.remaining, 0);

        clock.advance(Duration::from_secs(10));
        let second = limiter.check("contact:k", q);
        assert!(!second.allowed);
        assert!(second.retry_after_secs <= first.retry_after_secs);
        assert_eq!(second.retry_after_secs, 20);
    }

    #[test]
    fn retry_after_rounds_up_to_whole_seconds() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock(clock.clone());
        let q = quota(1, 30);

        assert!(limiter.check("k", q).allowed);
        clock.advance(Duration::from_millis(500));

        // 29.5s left in the window reports as 30
        assert_eq!(limiter.check("k", q).retry_after_secs, 30);
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock(clock.clone());

        limiter.check("short", quota(5, 1));
        limiter.check("long", quota(5, 100));
        assert_eq!(limiter.tracked_keys(), 2);

        clock.advance(Duration::from_secs(2));
        assert_eq!(limiter.sweep(), 1);
        assert_eq!(limiter.tracked_keys(), 1);

        // Swept key starts a fresh window
        let d = limiter.check("short", quota(5, 1));
        assert!(d.allowed);
        assert_eq!(d.remaining, 4);
    }

    #[test]
    fn concurrent_checks_never_overadmit() {
        let limiter = RateLimiter::new();
        let q = quota(5, 60);
        let threads = 20;

        let barrier = Barrier::new(threads);
        let admitted = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..threads {
                s.spawn(|| {
                    barrier.wait();
                    if limiter.check("contact:flood", q).allowed {
                        admitted.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(admitted.load(Ordering::SeqCst), 5);
    }

    #[test]
    #[should_panic(expected = "quota limit")]
    fn zero_limit_panics() {
        let _ = Quota::new(0, Duration::from_secs(60));
    }

    #[test]
    #[should_panic(expected = "quota window")]
    fn zero_window_panics() {
        let _ = Quota::new(5, Duration::ZERO);
    }
}
