use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded, select, tick};
use log::trace;

/// One auto-play period elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

/// Handle to a running auto-play ticker.
///
/// The ticker thread delivers [`Tick`]s on a channel; it stops when the handle is cancelled or
/// dropped, and dropping joins the thread so no tick can arrive after teardown.
#[derive(Debug)]
pub struct AutoPlayTask {
    cancel_tx: Option<Sender<()>>,
    ticks: Receiver<Tick>,
    handle: Option<JoinHandle<()>>,
}

impl AutoPlayTask {
    pub fn spawn(period: Duration) -> io::Result<Self> {
        let (cancel_tx, cancel_rx) = bounded::<()>(1);
        // Capacity one: ticks missed while the owner is busy coalesce instead of queueing.
        let (tick_tx, tick_rx) = bounded::<Tick>(1);
        let handle = thread::Builder::new()
            .name("archtour-autoplay".to_string())
            .spawn(move || {
                let ticker = tick(period);
                loop {
                    select! {
                        recv(cancel_rx) -> _ => break,
                        recv(ticker) -> _ => match tick_tx.try_send(Tick) {
                            Ok(()) | Err(TrySendError::Full(_)) => {}
                            Err(TrySendError::Disconnected(_)) => break,
                        },
                    }
                }
                trace!("Auto-play ticker stopped");
            })?;
        Ok(Self {
            cancel_tx: Some(cancel_tx),
            ticks: tick_rx,
            handle: Some(handle),
        })
    }

    /// Ticks that arrived since the last call, without blocking.
    pub fn pending(&self) -> usize {
        self.ticks.try_iter().count()
    }

    /// Blocks up to `timeout` for the next tick.
    pub fn wait(&self, timeout: Duration) -> Option<Tick> {
        match self.ticks.recv_timeout(timeout) {
            Ok(tick) => Some(tick),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Stops the ticker and joins its thread.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for AutoPlayTask {
    fn drop(&mut self) {
        if let Some(cancel_tx) = self.cancel_tx.take() {
            let _ = cancel_tx.try_send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
