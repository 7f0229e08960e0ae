// ABOUTME: Usage counter mirroring the server-reported Compression-Count header
// ABOUTME: Atomic last-write-wins integer with one process-wide instance

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const UNKNOWN: u64 = u64::MAX;

static GLOBAL: Lazy<Arc<UsageCounter>> = Lazy::new(|| Arc::new(UsageCounter::new()));

/// Most recently observed compression count.
#[derive(Debug)]
pub struct UsageCounter {
    value: AtomicU64,
}

impl UsageCounter {
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(UNKNOWN),
        }
    }

    /// The process-wide counter clients report into by default
    pub fn global() -> Arc<UsageCounter> {
        Arc::clone(&GLOBAL)
    }

    /// `None` until a response carried the header.
    pub fn get(&self) -> Option<u64> {
        match self.value.load(Ordering::Acquire) {
            UNKNOWN => None,
            value => Some(value),
        }
    }

    pub fn set(&self, value: u64) {
        self.value.store(value.min(UNKNOWN - 1), Ordering::Release);
    }
}

impl Default for UsageCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Compression count last reported to any client using the global counter
pub fn compression_count() -> Option<u64> {
    GLOBAL.get()
}
