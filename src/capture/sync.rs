//! One-shot release latch for synchronized capture starts.
//!
//! Both capture tasks block on a [`StartGate`] before issuing any network
//! I/O; the coordinator fires the [`StartSignal`] exactly once after both
//! tasks are spawned.  This bounds the relative start skew of the two
//! captures to scheduler wake-up latency instead of task-creation or
//! connection-setup cost.
//!
//! Built on `tokio::sync::watch`: the channel retains the fired value, so a
//! gate that subscribes (or polls) after the fire point still observes the
//! release immediately, and there is no way to re-arm the latch.

use tokio::sync::watch;

// ---------------------------------------------------------------------------
// StartSignal / StartGate
// ---------------------------------------------------------------------------

/// Single-writer side of the release latch.
#[derive(Debug)]
pub struct StartSignal {
    tx: watch::Sender<bool>,
}

/// Reader side; consumed by awaiting the release.
#[derive(Debug, Clone)]
pub struct StartGate {
    rx: watch::Receiver<bool>,
}

impl StartSignal {
    /// Create an unfired latch.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Obtain a gate that unblocks when (or after) the latch fires.
    pub fn gate(&self) -> StartGate {
        StartGate {
            rx: self.tx.subscribe(),
        }
    }

    /// Release every gate.  Further calls have no additional effect.
    pub fn fire(&self) {
        let _ = self.tx.send(true);
    }
}

impl Default for StartSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StartGate {
    /// Wait until the latch has fired.  Resolves immediately when it already
    /// has, including when the [`StartSignal`] was dropped after firing.
    pub async fn released(mut self) {
        // wait_for returns Err only when the sender is dropped; at that
        // point the retained value is all there will ever be.
        let _ = self.rx.wait_for(|fired| *fired).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn gate_blocks_until_fired() {
        let signal = StartSignal::new();
        let gate = signal.gate();
        let passed = Arc::new(AtomicBool::new(false));

        let passed_task = Arc::clone(&passed);
        let task = tokio::spawn(async move {
            gate.released().await;
            passed_task.store(true, Ordering::SeqCst);
        });

        // Let the task reach its wait point; it must not pass the gate yet.
        tokio::task::yield_now().await;
        assert!(!passed.load(Ordering::SeqCst));

        signal.fire();
        task.await.expect("task join");
        assert!(passed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn gate_subscribed_after_fire_passes_immediately() {
        let signal = StartSignal::new();
        signal.fire();
        signal.gate().released().await;
    }

    #[tokio::test]
    async fn both_gates_observe_a_single_fire() {
        let signal = StartSignal::new();
        let (g1, g2) = (signal.gate(), signal.gate());

        let t1 = tokio::spawn(g1.released());
        let t2 = tokio::spawn(g2.released());

        signal.fire();
        signal.fire(); // redundant; must be harmless

        t1.await.expect("gate 1");
        t2.await.expect("gate 2");
    }

    #[tokio::test]
    async fn fired_then_dropped_signal_still_releases() {
        let signal = StartSignal::new();
        let gate = signal.gate();
        signal.fire();
        drop(signal);
        gate.released().await;
    }
}
