#![forbid(unsafe_code)]

//! Trailing-edge debouncing of bursty notifications.
//!
//! A color picker dragged across the palette writes an attribute on every
//! tick. [`Debouncer`] collapses such a burst into one pending entry per key:
//! every new notification restarts that key's quiet window, and the key only
//! becomes due once the window elapses without another notification.
//!
//! The debouncer never reads a clock. Callers pass `now` in, which keeps it
//! deterministic under test.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use mailframe_core::Debouncer;
//! use web_time::Instant;
//!
//! let mut debounce = Debouncer::new();
//! let t0 = Instant::now();
//! let window = Duration::from_millis(100);
//!
//! debounce.schedule("group", t0, window);
//! debounce.schedule("group", t0 + Duration::from_millis(80), window);
//! assert!(debounce.take_due(t0 + Duration::from_millis(150)).is_empty());
//! assert_eq!(debounce.take_due(t0 + Duration::from_millis(180)), vec!["group"]);
//! ```

use std::hash::Hash;
use std::time::Duration;

use ahash::AHashMap;
use web_time::Instant;

#[derive(Debug, Clone, Copy)]
struct Pending {
    deadline: Instant,
    /// Order of the latest schedule, for deterministic ties.
    seq: u64,
}

/// Per-key trailing-edge debouncer.
#[derive(Debug, Clone)]
pub struct Debouncer<K> {
    pending: AHashMap<K, Pending>,
    seq: u64,
}

impl<K> Default for Debouncer<K> {
    fn default() -> Self {
        Self {
            pending: AHashMap::new(),
            seq: 0,
        }
    }
}

impl<K: Eq + Hash + Clone> Debouncer<K> {
    /// Empty debouncer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to fire `window` after `now`, replacing any earlier
    /// schedule for the same key.
    pub fn schedule(&mut self, key: K, now: Instant, window: Duration) {
        self.seq = self.seq.wrapping_add(1);
        self.pending.insert(
            key,
            Pending {
                deadline: now + window,
                seq: self.seq,
            },
        );
    }

    /// Drop a pending schedule. Returns whether one existed.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.pending.remove(key).is_some()
    }

    /// Drop every pending schedule matching `pred`.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&K) -> bool) {
        self.pending.retain(|key, _| !pred(key));
    }

    /// Whether `key` is waiting.
    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Remove and return every key whose window has elapsed at `now`,
    /// earliest deadline first.
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let mut due: Vec<(K, Pending)> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(k, p)| (k.clone(), *p))
            .collect();
        due.sort_by(|a, b| a.1.deadline.cmp(&b.1.deadline).then(a.1.seq.cmp(&b.1.seq)));
        for (key, _) in &due {
            self.pending.remove(key);
        }
        due.into_iter().map(|(k, _)| k).collect()
    }

    /// Earliest pending deadline, for scheduling the next wake-up.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Number of pending keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
