use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use super::loader::{LoadError, SnapshotResolver};
use super::model::{ProblemCollection, TimeWindow};

/// A fetch the session has asked for. `seq` increases with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub seq: u64,
    pub window: TimeWindow,
}

/// Outcome of one resolution, tagged with the ticket that requested it.
#[derive(Debug)]
pub struct LoadCompletion {
    pub seq: u64,
    pub window: TimeWindow,
    pub result: Result<ProblemCollection, LoadError>,
}

type Notify = Arc<dyn Fn() + Send + Sync>;

/// Queue a completion and run the notify hook once it is queued. A closed
/// receiver means the app is shutting down, so nothing is notified.
fn deliver(tx: &Sender<LoadCompletion>, notify: Option<&Notify>, completion: LoadCompletion) {
    if tx.send(completion).is_ok() {
        if let Some(notify) = notify {
            notify();
        }
    }
}

// ---------------------------------------------------------------------------
// Background loader
// ---------------------------------------------------------------------------

/// Resolves snapshots off the UI thread.
///
/// Every submitted ticket runs to completion on its own thread and is
/// reported through [`LoadWorker::poll`]; nothing is cancelled. Deciding
/// which completion to keep is left to the session.
pub struct LoadWorker {
    resolver: Arc<dyn SnapshotResolver>,
    tx: Sender<LoadCompletion>,
    rx: Receiver<LoadCompletion>,
    notify: Option<Notify>,
}

impl LoadWorker {
    pub fn new(resolver: Arc<dyn SnapshotResolver>) -> Self {
        let (tx, rx) = mpsc::channel();
        LoadWorker {
            resolver,
            tx,
            rx,
            notify: None,
        }
    }

    /// Called from the worker thread after each completion is queued,
    /// e.g. to wake the UI.
    pub fn with_notify(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notify = Some(Arc::new(notify));
        self
    }

    /// Use a different resolver for subsequent tickets. In-flight
    /// resolutions finish against the old one.
    pub fn set_resolver(&mut self, resolver: Arc<dyn SnapshotResolver>) {
        self.resolver = resolver;
    }

    pub fn submit(&self, ticket: LoadTicket) {
        let resolver = Arc::clone(&self.resolver);
        let tx = self.tx.clone();
        let notify = self.notify.clone();
        let LoadTicket { seq, window } = ticket;

        log::info!("Loading window {window} (request #{seq})");
        let spawned = std::thread::Builder::new()
            .name(format!("snapshot-load-{seq}"))
            .spawn({
                let window = window.clone();
                move || {
                    let completion = LoadCompletion {
                        seq,
                        result: resolver.resolve(&window),
                        window,
                    };
                    deliver(&tx, notify.as_ref(), completion);
                }
            });

        if let Err(e) = spawned {
            log::error!("Could not start loader thread: {e}");
            let completion = LoadCompletion {
                seq,
                window: window.clone(),
                result: Err(LoadError::Unreadable {
                    window,
                    source: anyhow::Error::new(e).context("starting loader thread"),
                }),
            };
            deliver(&self.tx, self.notify.as_ref(), completion);
        }
    }

    /// Drain every completion that has arrived, in arrival order.
    pub fn poll(&self) -> Vec<LoadCompletion> {
        self.rx.try_iter().collect()
    }

    /// Block until the next completion or `timeout`.
    pub fn wait(&self, timeout: Duration) -> Option<LoadCompletion> {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::StaticResolver;
    use crate::data::model::{ProblemRecord, Snapshot};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn resolver() -> Arc<dyn SnapshotResolver> {
        Arc::new(StaticResolver::new().with_snapshot(
            Snapshot::ThirtyDays,
            vec![ProblemRecord {
                title: "Two Sum".into(),
                ..Default::default()
            }],
        ))
    }

    #[test]
    fn completion_carries_ticket_tag() {
        let worker = LoadWorker::new(resolver());
        worker.submit(LoadTicket {
            seq: 7,
            window: TimeWindow::Days30,
        });

        let done = worker.wait(Duration::from_secs(5)).expect("completion");
        assert_eq!(done.seq, 7);
        assert_eq!(done.window, TimeWindow::Days30);
        assert_eq!(done.result.unwrap().len(), 1);
    }

    #[test]
    fn failures_are_reported_not_dropped() {
        let worker = LoadWorker::new(resolver());
        worker.submit(LoadTicket {
            seq: 1,
            window: TimeWindow::Days90,
        });

        let done = worker.wait(Duration::from_secs(5)).expect("completion");
        let err = done.result.unwrap_err();
        assert!(err.to_string().starts_with("Failed to load 90 data"));
    }

    #[test]
    fn notify_runs_after_each_completion() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let worker = LoadWorker::new(resolver()).with_notify(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        for seq in 1..=2 {
            worker.submit(LoadTicket {
                seq,
                window: TimeWindow::Days30,
            });
        }
        for _ in 0..2 {
            worker.wait(Duration::from_secs(5)).expect("completion");
        }
        // notify fires after send; give the last thread a moment to return.
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while hits.load(Ordering::SeqCst) < 2 && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_start_still_wakes_the_ui() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let notify: Notify = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let (tx, rx) = mpsc::channel();

        let completion = LoadCompletion {
            seq: 3,
            window: TimeWindow::Days90,
            result: Err(LoadError::Unreadable {
                window: TimeWindow::Days90,
                source: anyhow::anyhow!("starting loader thread"),
            }),
        };
        deliver(&tx, Some(&notify), completion);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        let done = rx.try_recv().unwrap();
        assert_eq!(done.seq, 3);
        assert!(done.result.is_err());
    }

    #[test]
    fn closed_receiver_skips_notify() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let notify: Notify = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let (tx, rx) = mpsc::channel();
        drop(rx);

        let completion = LoadCompletion {
            seq: 1,
            window: TimeWindow::Days30,
            result: Ok(ProblemCollection::new(TimeWindow::Days30, Vec::new())),
        };
        deliver(&tx, Some(&notify), completion);

        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
