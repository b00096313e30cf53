use std::time::Duration;

use log::debug;
use log::warn;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Quiet period used when the caller does not pick one.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

#[derive(Debug)]
struct PendingTimer {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PendingTimer {
    fn cancel(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

/// Collapses a burst of raw values into a single settled value.
///
/// Every [`Debouncer::push`] replaces the pending timer, so only the last
/// value of a burst reaches the receiver, and only once no new value has
/// arrived for the configured quiet period. Settled values are delivered on
/// the channel returned by [`Debouncer::new`].
///
/// After [`Debouncer::dispose`] (or drop) nothing is emitted anymore and the
/// receiver observes a closed channel once the last timer task is gone.
///
/// Timers are tokio tasks spawned on the current runtime. Outside a runtime
/// `push` drops the value and reports it did not arm a timer.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    tx: Option<UnboundedSender<T>>,
    pending: Option<PendingTimer>,
    shutdown: CancellationToken,
}

impl<T> Debouncer<T>
where
    T: Send + 'static,
{
    pub fn new(delay: Duration) -> (Self, UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            tx: Some(tx),
            pending: None,
            shutdown: CancellationToken::new(),
        };
        (debouncer, rx)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Feed a raw value. Cancels the pending timer and arms a new one.
    ///
    /// Returns whether a timer was armed: `false` once disposed or when no
    /// tokio runtime is available.
    pub fn push(&mut self, value: T) -> bool {
        let Some(tx) = self.tx.clone() else {
            debug!("debouncer disposed; dropping raw value");
            return false;
        };

        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                warn!("no tokio runtime to arm debounce timer; dropping raw value: {err}");
                return false;
            }
        };

        let cancel = self.shutdown.child_token();
        let timer_cancel = cancel.clone();
        let delay = self.delay;
        let task = runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = timer_cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if !timer_cancel.is_cancelled() {
                        let _ = tx.send(value);
                    }
                }
            }
        });

        self.pending = Some(PendingTimer { cancel, task });
        true
    }

    /// True while a timer is armed and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.task.is_finished())
    }

    /// Cancel the pending timer without disposing. A later `push` re-arms.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }

    /// Release the timer and stop emitting for good.
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }
        self.shutdown.cancel();
        self.cancel();
        self.tx = None;
        debug!("debouncer disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.tx.is_none()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.shutdown.cancel();
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc::error::TryRecvError;
    use tokio::time::Instant;
    use tokio::time::sleep;

    const QUIET: Duration = Duration::from_millis(1000);

    #[tokio::test(start_paused = true)]
    async fn burst_emits_only_last_value() {
        let (mut debouncer, mut rx) = Debouncer::new(QUIET);
        assert_eq!(debouncer.delay(), QUIET);

        debouncer.push("a".to_string());
        sleep(Duration::from_millis(300)).await;
        debouncer.push("an".to_string());
        sleep(Duration::from_millis(300)).await;
        let last_push = Instant::now();
        debouncer.push("ann".to_string());

        assert_eq!(rx.recv().await, Some("ann".to_string()));
        assert!(last_push.elapsed() >= QUIET);

        sleep(QUIET * 3).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_is_emitted_before_quiet_period() {
        let (mut debouncer, mut rx) = Debouncer::new(QUIET);

        debouncer.push("lee".to_string());
        sleep(Duration::from_millis(999)).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert!(debouncer.is_pending());

        assert_eq!(rx.recv().await, Some("lee".to_string()));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn no_emission_without_input() {
        let (debouncer, mut rx) = Debouncer::<String>::new(QUIET);

        sleep(QUIET * 5).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn separate_quiet_periods_emit_separately() {
        let (mut debouncer, mut rx) = Debouncer::new(QUIET);

        debouncer.push(1);
        assert_eq!(rx.recv().await, Some(1));

        debouncer.push(2);
        debouncer.push(3);
        assert_eq!(rx.recv().await, Some(3));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_value_but_allows_rearm() {
        let (mut debouncer, mut rx) = Debouncer::new(QUIET);

        debouncer.push("stale");
        debouncer.cancel();
        sleep(QUIET * 2).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        debouncer.push("fresh");
        assert_eq!(rx.recv().await, Some("fresh"));
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_suppresses_pending_timer() {
        let (mut debouncer, mut rx) = Debouncer::new(QUIET);

        debouncer.push("ghost".to_string());
        sleep(Duration::from_millis(500)).await;
        debouncer.dispose();

        assert!(debouncer.is_disposed());
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn push_after_dispose_is_ignored() {
        let (mut debouncer, mut rx) = Debouncer::new(QUIET);

        debouncer.dispose();
        assert!(!debouncer.push("late".to_string()));

        assert!(!debouncer.is_pending());
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_releases_timer() {
        let (mut debouncer, mut rx) = Debouncer::new(QUIET);

        debouncer.push("dropped".to_string());
        drop(debouncer);

        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn push_without_runtime_drops_value() {
        let (mut debouncer, mut rx) = Debouncer::new(QUIET);

        assert!(!debouncer.push("offline".to_string()));
        assert!(!debouncer.is_pending());
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        debouncer.dispose();
        assert_eq!(rx.try_recv(), Err(TryRecvError::Disconnected));
    }
}
