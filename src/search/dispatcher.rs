//! Runs directory searches off the event loop.
//!
//! Tickets go in through a bounded channel and never block the caller. A
//! router thread takes each ticket, drops it if a newer generation has been
//! announced, and otherwise runs the directory call on a thread of its own.
//! A directory call that never returns therefore holds only its own thread;
//! later tickets still run. Completions come back on a second channel and are
//! drained by the owner, where the generation check discards late arrivals.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use tracing::{debug, warn};

use crate::error::DirectoryError;
use crate::record::ContactRecord;

use super::controller::SearchTicket;
use super::directory::ContactDirectory;

/// Outcome of one issued search.
#[derive(Debug, Clone)]
pub struct SearchCompletion {
    /// The ticket this completion answers.
    pub ticket: SearchTicket,
    /// Records returned by the directory, or why there are none.
    pub outcome: Result<Vec<ContactRecord>, DirectoryError>,
}

/// Owns the search router thread.
pub struct SearchDispatcher {
    tx: Sender<SearchTicket>,
    completions: Receiver<SearchCompletion>,
    latest: Arc<AtomicU64>,
    router: Option<JoinHandle<()>>,
    queue_capacity: usize,
}

impl SearchDispatcher {
    /// Spawns the router.
    pub fn start(directory: Arc<dyn ContactDirectory>, queue_capacity: usize) -> Self {
        let queue_capacity = queue_capacity.max(1);
        let (tx, rx) = bounded::<SearchTicket>(queue_capacity);
        let (done_tx, completions) = bounded::<SearchCompletion>(queue_capacity);
        let latest = Arc::new(AtomicU64::new(0));

        let router_latest = Arc::clone(&latest);
        let router = thread::Builder::new()
            .name("contact-search".to_string())
            .spawn(move || {
                while let Ok(ticket) = rx.recv() {
                    let latest = router_latest.load(Ordering::Acquire);
                    if ticket.generation < latest {
                        debug!(
                            query = %ticket.query,
                            generation = ticket.generation,
                            latest,
                            "skipping superseded search"
                        );
                        continue;
                    }
                    run_ticket(&directory, ticket, &done_tx);
                }
            })
            .expect("failed to spawn contact search router");

        Self {
            tx,
            completions,
            latest,
            router: Some(router),
            queue_capacity,
        }
    }

    /// Announces the newest query generation.
    ///
    /// Queued tickets older than `generation` are skipped without reaching
    /// the directory. Generations never move backwards.
    pub fn supersede(&self, generation: u64) {
        self.latest.fetch_max(generation, Ordering::AcqRel);
    }

    /// Queues a ticket without blocking.
    ///
    /// On failure the ticket is handed back as a failed completion so the
    /// caller can route it through the same path as directory errors.
    pub fn submit(&self, ticket: SearchTicket) -> Result<(), SearchCompletion> {
        self.supersede(ticket.generation);
        match self.tx.try_send(ticket) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(ticket)) => {
                warn!(query = %ticket.query, capacity = self.queue_capacity, "search queue full");
                Err(SearchCompletion {
                    ticket,
                    outcome: Err(DirectoryError::QueueFull {
                        capacity: self.queue_capacity,
                    }),
                })
            }
            Err(TrySendError::Disconnected(ticket)) => {
                warn!(query = %ticket.query, "search router disconnected");
                Err(SearchCompletion {
                    ticket,
                    outcome: Err(DirectoryError::Disconnected),
                })
            }
        }
    }

    /// Returns every completion that has already arrived.
    pub fn drain(&self) -> Vec<SearchCompletion> {
        self.completions.try_iter().collect()
    }

    /// Waits for the next completion.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<SearchCompletion> {
        match self.completions.recv_timeout(timeout) {
            Ok(done) => Some(done),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Closes the queue and joins the router.
    ///
    /// Searches already handed to their own threads are not waited for.
    pub fn shutdown(mut self) {
        let (closed, _) = bounded::<SearchTicket>(1);
        drop(std::mem::replace(&mut self.tx, closed));
        if let Some(router) = self.router.take() {
            if router.join().is_err() {
                warn!("contact search router panicked");
            }
        }
    }
}

/// Runs one directory call on a dedicated thread.
fn run_ticket(
    directory: &Arc<dyn ContactDirectory>,
    ticket: SearchTicket,
    done_tx: &Sender<SearchCompletion>,
) {
    let generation = ticket.generation;
    let query = ticket.query.clone();
    let worker_directory = Arc::clone(directory);
    let worker_done = done_tx.clone();

    let spawned = thread::Builder::new()
        .name(format!("contact-search-{generation}"))
        .spawn(move || {
            let outcome = worker_directory.search_global(&ticket.query);
            // The owner is gone when this fails; nothing is waiting.
            let _ = worker_done.send(SearchCompletion { ticket, outcome });
        });

    if let Err(err) = spawned {
        warn!(query = %query, generation, error = %err, "failed to spawn search thread");
        let _ = done_tx.send(SearchCompletion {
            ticket: SearchTicket { generation, query },
            outcome: Err(DirectoryError::Unavailable {
                message: format!("search thread unavailable: {err}"),
            }),
        });
    }
}

impl Drop for SearchDispatcher {
    fn drop(&mut self) {
        // Dropping `tx` ends the router loop; it is detached rather than
        // joined so dropping never waits on the directory.
        drop(self.router.take());
    }
}

impl std::fmt::Debug for SearchDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchDispatcher")
            .field("queue_capacity", &self.queue_capacity)
            .field("latest", &self.latest.load(Ordering::Relaxed))
            .field("running", &self.router.is_some())
            .finish()
    }
}
