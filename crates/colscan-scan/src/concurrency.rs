//! The scan's resource model: segments and statistics are
//! immutable and safe to scan from multiple threads at once; the only
//! shared mutable state a scan touches is a coarse cancellation flag
//! and an access counter, both cheap enough to check once per chunk
//! rather than once per row.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// A flag a caller can set from another thread to ask a running scan to
/// stop early. Checked once per chunk boundary, never inside the
/// per-row inner loop — a scan already past that check for a chunk
/// always finishes the chunk.
#[derive(Debug, Default)]
pub struct CancellationToken {
    cancelled: AtomicBool,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self { cancelled: AtomicBool::new(false) }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// One sample in the access counter's history: a snapshot of the
/// monotonic total at the time it was taken.
#[derive(Debug, Clone, Copy)]
pub struct AccessSample {
    pub total: u64,
}

/// A single monotonic counter of rows scanned, incremented with relaxed
/// ordering from the scan's hot path, paired with a bounded ring buffer
/// of historical samples appended by a single background sampler
/// thread. The scan itself never touches the
/// ring buffer — only `sample()` does, and it is not meant to be called
/// from more than one thread at a time.
#[derive(Debug)]
pub struct AccessCounter {
    total: AtomicU64,
    history: Mutex<VecDeque<AccessSample>>,
    capacity: usize,
}

impl AccessCounter {
    pub fn new(capacity: usize) -> Self {
        Self {
            total: AtomicU64::new(0),
            history: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Record `n` more rows scanned. Called from the scan's hot path;
    /// must stay cheap.
    pub fn add(&self, n: u64) {
        self.total.fetch_add(n, Ordering::Relaxed);
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Append the current total as a new historical sample, evicting
    /// the oldest sample if the ring buffer is full. Intended to be
    /// called periodically by a single background sampler, never from
    /// the scan path itself.
    pub fn sample(&self) {
        let total = self.total();
        let mut history = self.history.lock().expect("access counter history mutex poisoned");
        if history.len() == self.capacity {
            history.pop_front();
        }
        history.push_back(AccessSample { total });
    }

    pub fn history(&self) -> Vec<AccessSample> {
        self.history.lock().expect("access counter history mutex poisoned").iter().copied().collect()
    }
}
