// ── Debounced filter dispatch ──
//
// Keystrokes update the echo value immediately. The filter itself is
// applied once input has been quiet for the debounce window, carrying the
// last value. One timer task exists at most; every call cancels it and
// arms a fresh one.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Quiet window before a filter value is applied.
pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(350);

struct PendingDispatch {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Debounces filter input into apply events sent on an `mpsc` channel.
///
/// `wrap` turns the applied value into the channel's message type, so the
/// gate can feed an action loop directly (`FilterGate::new(tx, Action::ApplyFilter)`).
/// Must be used from within a tokio runtime.
pub struct FilterGate<T: Send + 'static> {
    echo: String,
    window: Duration,
    tx: mpsc::UnboundedSender<T>,
    wrap: fn(String) -> T,
    pending: Option<PendingDispatch>,
}

impl<T: Send + 'static> FilterGate<T> {
    pub fn new(tx: mpsc::UnboundedSender<T>, wrap: fn(String) -> T) -> Self {
        Self {
            echo: String::new(),
            window: FILTER_DEBOUNCE,
            tx,
            wrap,
            pending: None,
        }
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// The value shown in the input box.
    pub fn value(&self) -> &str {
        &self.echo
    }

    /// Update the echo value only.
    pub fn set_filter_value(&mut self, value: impl Into<String>) {
        self.echo = value.into();
    }

    /// Re-arm the trailing timer with `value`.
    pub fn set_filter_debounced(&mut self, value: impl Into<String>) {
        self.cancel_pending();

        let value = value.into();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let tx = self.tx.clone();
        let wrap = self.wrap;
        let window = self.window;

        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {}
                () = tokio::time::sleep(window) => {
                    trace!(filter = %value, "applying debounced filter");
                    let _ = tx.send(wrap(value));
                }
            }
        });

        self.pending = Some(PendingDispatch { cancel, handle });
    }

    /// Input handler: echo now, apply after the quiet window.
    pub fn set_filter(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.set_filter_value(value.clone());
        self.set_filter_debounced(value);
    }

    /// Clear both the echo value and the applied filter, dropping any
    /// pending dispatch. Called when a view is mounted.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.echo.clear();
        let _ = self.tx.send((self.wrap)(String::new()));
    }

    /// Apply the echo value right away (e.g. on Enter).
    pub fn flush(&mut self) {
        self.cancel_pending();
        let _ = self.tx.send((self.wrap)(self.echo.clone()));
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| !p.handle.is_finished())
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel.cancel();
        }
    }
}

impl<T: Send + 'static> Drop for FilterGate<T> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gate() -> (FilterGate<String>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (FilterGate::new(tx, |s| s), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn bursts_coalesce_into_last_value() {
        let (mut gate, mut rx) = gate();

        for value in ["a", "ab", "abc", "abcd", "abcde"] {
            gate.set_filter(value);
            assert_eq!(gate.value(), value);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(rx.try_recv().is_err(), "nothing applied while typing");
        assert!(gate.is_pending());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(rx.try_recv().unwrap(), "abcde");
        assert!(rx.try_recv().is_err(), "exactly one apply event");
        assert!(!gate.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_apply_separately() {
        let (mut gate, mut rx) = gate();

        gate.set_filter("transit");
        tokio::time::sleep(Duration::from_millis(400)).await;
        gate.set_filter("content");
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(rx.try_recv().unwrap(), "transit");
        assert_eq!(rx.try_recv().unwrap(), "content");
    }

    #[tokio::test(start_paused = true)]
    async fn reset_clears_and_cancels() {
        let (mut gate, mut rx) = gate();

        gate.set_filter("stale");
        gate.reset();
        assert_eq!(gate.value(), "");
        assert_eq!(rx.try_recv().unwrap(), "");

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err(), "cancelled value never applied");
    }

    #[tokio::test(start_paused = true)]
    async fn flush_applies_immediately() {
        let (mut gate, mut rx) = gate();

        gate.set_filter("64500");
        gate.flush();
        assert_eq!(rx.try_recv().unwrap(), "64500");

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }
}
