//! Signal handling: SIGINT/SIGTERM graceful shutdown and an interruptible
//! wait between monitor ticks.
//!
//! Uses the `signal-hook` crate for safe signal registration. A signal (or a
//! programmatic request) sets the shutdown flag and wakes any thread blocked in
//! [`SignalHandler::wait`], so the monitor never sleeps out a full poll
//! interval after being asked to stop.

#![allow(missing_docs)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded};

/// Thread-safe shutdown state shared between the signal listener and the loop.
#[derive(Clone)]
pub struct SignalHandler {
    shutdown_flag: Arc<AtomicBool>,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl SignalHandler {
    /// Create a new handler and register OS signal hooks.
    ///
    /// On Unix: SIGINT/SIGTERM -> shutdown. Registration is best-effort;
    /// failures are logged to stderr but not fatal.
    pub fn new() -> Self {
        let handler = Self::detached();
        handler.register_signals();
        handler
    }

    /// Create a handler that only reacts to [`request_shutdown`](Self::request_shutdown).
    pub fn detached() -> Self {
        // One pending wake-up is enough: the flag carries the state.
        let (wake_tx, wake_rx) = bounded(1);
        Self {
            shutdown_flag: Arc::new(AtomicBool::new(false)),
            wake_tx,
            wake_rx,
        }
    }

    /// Check whether a shutdown has been requested.
    pub fn should_shutdown(&self) -> bool {
        self.shutdown_flag.load(Ordering::Acquire)
    }

    /// Programmatically request shutdown and wake any pending wait.
    pub fn request_shutdown(&self) {
        self.shutdown_flag.store(true, Ordering::Release);
        let _ = self.wake_tx.try_send(());
    }

    /// Block for up to `timeout`, returning early on a shutdown request.
    ///
    /// Returns `true` if shutdown has been requested.
    pub fn wait(&self, timeout: Duration) -> bool {
        if self.should_shutdown() {
            return true;
        }
        // Timeout and wake-up both end in a flag check; stale wake-ups are harmless.
        let _ = self.wake_rx.recv_timeout(timeout);
        self.should_shutdown()
    }

    #[cfg(all(unix, feature = "daemon"))]
    fn register_signals(&self) {
        use signal_hook::consts::{SIGINT, SIGTERM};
        use signal_hook::iterator::Signals;

        let mut signals = match Signals::new([SIGINT, SIGTERM]) {
            Ok(signals) => signals,
            Err(e) => {
                eprintln!("[CWD-SIGNAL] failed to register SIGINT/SIGTERM: {e}");
                return;
            }
        };

        let handler = self.clone();
        let spawned = std::thread::Builder::new()
            .name("capwatch-signals".to_string())
            .spawn(move || {
                for _ in signals.forever() {
                    handler.request_shutdown();
                }
            });
        if let Err(e) = spawned {
            eprintln!("[CWD-SIGNAL] failed to start signal listener: {e}");
        }
    }

    #[cfg(not(all(unix, feature = "daemon")))]
    fn register_signals(&self) {}
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ──────────────────── tests ────────────────────
