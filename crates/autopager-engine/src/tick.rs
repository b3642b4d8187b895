//! Messages posted onto the UI queue and the one-tick deferral primitive.

use crate::producer::FetchError;
use autopager_core::PageIndex;
use autopager_domain::Page;
use tokio::sync::mpsc;

/// Work the UI task must apply to the coordinator, in arrival order.
#[derive(Debug)]
pub enum UiMessage<E> {
    /// A fetch finished with a page.
    Produced(Page<E>),
    /// A fetch failed.
    Failed { index: PageIndex, error: FetchError },
    /// A deferred fill check; stale epochs are dropped.
    FillCheck { epoch: u64 },
}

/// Schedules the fill check one tick later by posting it behind whatever is
/// already queued, never running it inside the callback that asked for it.
///
/// Cancelling bumps the epoch so a message already in the queue is ignored
/// when it arrives.
#[derive(Debug)]
pub struct NextTick<E> {
    tx: mpsc::UnboundedSender<UiMessage<E>>,
    epoch: u64,
    pending: bool,
}

impl<E> NextTick<E> {
    pub fn new(tx: mpsc::UnboundedSender<UiMessage<E>>) -> Self {
        Self {
            tx,
            epoch: 0,
            pending: false,
        }
    }

    /// Post a fill check. Returns false if one is already pending or the queue is closed.
    pub fn schedule_fill_check(&mut self) -> bool {
        if self.pending {
            return false;
        }
        match self.tx.send(UiMessage::FillCheck { epoch: self.epoch }) {
            Ok(()) => {
                self.pending = true;
                true
            }
            Err(_) => {
                tracing::debug!("UI queue closed; fill check not scheduled");
                false
            }
        }
    }

    /// Claim the tick carried by a `FillCheck` message. False means it was cancelled.
    pub fn take(&mut self, epoch: u64) -> bool {
        if self.pending && epoch == self.epoch {
            self.pending = false;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        if self.pending {
            tracing::debug!("Cancelling pending fill check");
        }
        self.epoch += 1;
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_posts_once() {
        let (tx, mut rx) = mpsc::unbounded_channel::<UiMessage<()>>();
        let mut tick = NextTick::new(tx);

        assert!(tick.schedule_fill_check());
        assert!(!tick.schedule_fill_check());
        assert!(tick.is_pending());

        let Ok(UiMessage::FillCheck { epoch }) = rx.try_recv() else {
            panic!("expected a fill check");
        };
        assert!(rx.try_recv().is_err());
        assert!(tick.take(epoch));
        assert!(!tick.is_pending());
        assert!(!tick.take(epoch));
    }

    #[test]
    fn test_cancelled_tick_is_dropped() {
        let (tx, mut rx) = mpsc::unbounded_channel::<UiMessage<()>>();
        let mut tick = NextTick::new(tx);

        tick.schedule_fill_check();
        tick.cancel();

        let Ok(UiMessage::FillCheck { epoch }) = rx.try_recv() else {
            panic!("expected a fill check");
        };
        assert!(!tick.take(epoch));

        // A fresh schedule after cancelling is honoured.
        assert!(tick.schedule_fill_check());
        let Ok(UiMessage::FillCheck { epoch }) = rx.try_recv() else {
            panic!("expected a fill check");
        };
        assert!(tick.take(epoch));
    }

    #[test]
    fn test_closed_queue() {
        let (tx, rx) = mpsc::unbounded_channel::<UiMessage<()>>();
        drop(rx);
        let mut tick = NextTick::new(tx);

        assert!(!tick.schedule_fill_check());
        assert!(!tick.is_pending());
    }
}
