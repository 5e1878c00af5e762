//! Process-wide cooperative cancellation.
//!
//! A [`CancellationSignal`] moves from active to cancelled exactly once.
//! Clones share state, so the coordinator and the example it is running
//! observe the same transition. Examples check it at their own suspension
//! points; the coordinator also races every invocation against it.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::{ExampleError, ExampleResult};

#[derive(Default)]
struct SignalState {
    cancelled: AtomicBool,
    wake: CancellationToken,
}

/// Shared, monotonic cancellation flag.
#[derive(Clone, Default)]
pub struct CancellationSignal {
    state: Arc<SignalState>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transition to cancelled.
    ///
    /// Returns `true` only for the call that performed the transition;
    /// every later request is a no-op.
    pub fn request_cancellation(&self) -> bool {
        if self.state.cancelled.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.state.wake.cancel();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once cancellation has been requested.
    pub async fn cancelled(&self) {
        self.state.wake.cancelled().await
    }

    /// `Err(Cancelled)` once cancellation has been requested.
    pub fn ensure_active(&self) -> ExampleResult<()> {
        if self.is_cancelled() {
            Err(ExampleError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Drive `fut` unless cancellation wins the race first.
    pub async fn run_until_cancelled<F>(&self, fut: F) -> ExampleResult<F::Output>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(ExampleError::Cancelled),
            output = fut => Ok(output),
        }
    }
}

impl fmt::Debug for CancellationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationSignal")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Create a fresh, active signal.
pub fn new_signal() -> CancellationSignal {
    CancellationSignal::new()
}

/// Route the OS interrupt (Ctrl+C) into `signal`.
///
/// Installing the listener replaces the default terminate-on-interrupt
/// behaviour. `on_first` runs once, on the interrupt that actually cancels
/// the signal; repeated interrupts are absorbed.
pub fn install_interrupt_handler<F>(signal: CancellationSignal, on_first: F) -> JoinHandle<()>
where
    F: Fn() + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for interrupt");
                return;
            }
            on_interrupt(&signal, &on_first);
        }
    })
}

/// Handle one interrupt: cancel `signal` and run `on_first` if this call
/// performed the transition. Returns whether it did.
fn on_interrupt<F>(signal: &CancellationSignal, on_first: &F) -> bool
where
    F: Fn(),
{
    if !signal.request_cancellation() {
        return false;
    }
    info!("interrupt received, cancelling run");
    on_first();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_signal_is_active() {
        let signal = new_signal();
        assert!(!signal.is_cancelled());
        assert!(signal.ensure_active().is_ok());
    }

    #[test]
    fn test_transition_happens_once() {
        let signal = CancellationSignal::new();
        assert!(signal.request_cancellation());
        assert!(!signal.request_cancellation());
        assert!(signal.is_cancelled());
    }

    #[test]
    fn test_clones_share_state() {
        let signal = CancellationSignal::new();
        let other = signal.clone();
        other.request_cancellation();
        assert!(signal.is_cancelled());
        assert!(matches!(signal.ensure_active(), Err(ExampleError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancelled_wakes_waiter() {
        let signal = CancellationSignal::new();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.cancelled().await })
        };
        signal.request_cancellation();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter woke")
            .expect("task joined");
    }

    #[tokio::test]
    async fn test_run_until_cancelled_passes_output_through() {
        let signal = CancellationSignal::new();
        let value = signal
            .run_until_cancelled(async { 7 })
            .await
            .expect("not cancelled");
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_cancelled_abandons_pending_work() {
        let signal = CancellationSignal::new();
        let canceller = signal.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.request_cancellation();
        });

        let result = signal
            .run_until_cancelled(futures::future::pending::<()>())
            .await;
        assert!(matches!(result, Err(ExampleError::Cancelled)));
    }

    #[test]
    fn test_repeated_interrupts_notify_once() {
        use std::sync::atomic::AtomicUsize;

        let signal = CancellationSignal::new();
        let notices = AtomicUsize::new(0);
        let notify = || {
            notices.fetch_add(1, Ordering::SeqCst);
        };

        assert!(on_interrupt(&signal, &notify));
        assert!(!on_interrupt(&signal, &notify));
        assert!(!on_interrupt(&signal, &notify));
        assert!(signal.is_cancelled());
        assert_eq!(notices.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_interrupt_after_programmatic_cancel_is_silent() {
        let signal = CancellationSignal::new();
        signal.request_cancellation();

        let notified = std::cell::Cell::new(false);
        assert!(!on_interrupt(&signal, &|| notified.set(true)));
        assert!(!notified.get());
    }

    #[tokio::test]
    async fn test_installed_handler_leaves_signal_active_without_interrupt() {
        let signal = CancellationSignal::new();
        let handle = install_interrupt_handler(signal.clone(), || {});
        tokio::task::yield_now().await;
        assert!(!signal.is_cancelled());
        handle.abort();
    }

    #[test]
    fn test_debug_shows_state() {
        let signal = CancellationSignal::new();
        assert_eq!(format!("{signal:?}"), "CancellationSignal { cancelled: false }");
    }
}
