use tokio::sync::mpsc::{self, error::TrySendError};

/// Producer half of the "something changed" notification.  Cheap to clone,
/// one clone per poll worker.
#[derive(Debug, Clone)]
pub struct ChangeSignal {
    tx: mpsc::Sender<()>,
}

/// Consumer half, owned by the display loop.
#[derive(Debug)]
pub struct ChangeListener {
    rx: mpsc::Receiver<()>,
}

/// Creates a single-slot coalescing channel.  Any number of `notify()` calls
/// between two `changed()` calls collapse into one wake-up.
pub fn change_signal() -> (ChangeSignal, ChangeListener) {
    let (tx, rx) = mpsc::channel(1);
    (ChangeSignal { tx }, ChangeListener { rx })
}

impl ChangeSignal {
    /// Never blocks.  A full slot already guarantees a redraw, so the
    /// ping is dropped.
    pub fn notify(&self) {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => {}
            Err(TrySendError::Closed(())) => {
                tracing::trace!("change listener gone, dropping notification");
            }
        }
    }
}

impl ChangeListener {
    /// Waits for the next pending change.  Returns `false` once every
    /// `ChangeSignal` has been dropped and nothing is pending.
    pub async fn changed(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }

    /// Consumes a pending change without waiting.
    #[cfg(test)]
    fn try_changed(&mut self) -> bool {
        self.rx.try_recv().is_ok()
    }
}
