//! Background thread driving the scheduler.
//!
//! # Responsibility
//! - Tick the scheduler on the reminder poll interval until stopped.
//!
//! # Invariants
//! - Ticks run serialized on one thread: a slow tick delays the next
//!   instead of overlapping it.
//! - Dropping the worker handle without calling `stop` still ends the
//!   thread at its next wakeup (the stop channel disconnects).

use crate::notify::clock::Clock;
use crate::notify::notifier::Notifier;
use crate::notify::scheduler::NotifyScheduler;
use crate::repo::record_store::RecordStore;
use log::info;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};

/// Handle to the background notification thread.
pub struct NotifyWorker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl NotifyWorker {
    /// Spawns the polling thread. The scheduler is started and polled
    /// once immediately, then on every interval.
    pub fn spawn<S, N, C>(mut scheduler: NotifyScheduler<S, N, C>) -> std::io::Result<NotifyWorker>
    where
        S: RecordStore + Send + 'static,
        N: Notifier + Send + 'static,
        C: Clock + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("memoboard-notify".to_string())
            .spawn(move || {
                let interval = scheduler.config().reminder_poll_interval;
                scheduler.start();
                scheduler.poll();
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                        Err(RecvTimeoutError::Timeout) => scheduler.poll(),
                    }
                }
                info!("event=notify_worker module=notify status=stopped");
            })?;

        info!("event=notify_worker module=notify status=started");
        Ok(Self { stop_tx, handle })
    }

    /// Signals the worker thread and waits for it to finish.
    pub fn stop(self) {
        let _ = self.stop_tx.send(());
        let _ = self.handle.join();
    }
}
