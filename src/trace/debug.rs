use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

static DEBUG: AtomicBool = AtomicBool::new(false);

/// Turn diagnostic logging on or off for the whole process.
pub fn set_debug(enabled: bool) {
    DEBUG.store(enabled, Ordering::Relaxed);
}

pub fn debug_enabled() -> bool {
    DEBUG.load(Ordering::Relaxed)
}

/// Log a diagnostic line, only when the debug toggle is on.
#[macro_export]
macro_rules! diag {
    ($($arg:tt)+) => {
        if $crate::trace::debug::debug_enabled() {
            log::debug!($($arg)+);
        }
    };
}

/// Measures elapsed time for a labelled operation.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    label: String,
    started: Instant,
}

impl Stopwatch {
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed().as_millis()
    }

    /// Report the elapsed time for `checkpoint` through the diagnostic log.
    pub fn lap(&self, checkpoint: &str) -> u128 {
        let ms = self.elapsed_ms();
        crate::diag!("[{}] {} after {} ms", self.label, checkpoint, ms);
        ms
    }
}
