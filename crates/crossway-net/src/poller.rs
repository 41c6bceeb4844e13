//! Background snapshot poller
//!
//! Each dispatched poll runs a full step + agents cycle on its own thread
//! and reports back over an mpsc channel, so the render loop keeps drawing
//! stale state while a response is pending. Results carry the sequence
//! number assigned when the poll was issued; the reconciler uses it to
//! drop responses that complete out of order.

use crate::client::SimClient;
use crossway_core::Result;
use crossway_scene::{AgentSnapshot, CurrentStats};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};

/// Outcome of one background poll
pub struct PollResult {
    /// Issue sequence number, monotonically increasing per poller
    pub seq: u64,
    pub snapshot: Result<AgentSnapshot>,
    /// Best-effort statistics readout; None if the stats fetch failed
    pub stats: Option<CurrentStats>,
}

/// Dispatches polls to worker threads and drains their results
pub struct Poller {
    client: SimClient,
    sender: mpsc::Sender<PollResult>,
    receiver: mpsc::Receiver<PollResult>,
    next_seq: u64,
    in_flight: Arc<AtomicUsize>,
}

impl Poller {
    pub fn new(client: SimClient) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            client,
            sender,
            receiver,
            next_seq: 0,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Claim the next issue sequence number. Used directly for the one
    /// synchronous startup fetch; background dispatches claim internally.
    pub fn claim_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Number of polls currently running
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Start a step + fetch cycle on a worker thread and return its
    /// sequence number. Never blocks the caller.
    pub fn dispatch(&mut self) -> u64 {
        let seq = self.claim_seq();
        let client = self.client.clone();
        let sender = self.sender.clone();
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::AcqRel);

        std::thread::spawn(move || {
            let snapshot = client.step().and_then(|_| client.agents());
            let stats = client.stats().ok().map(|s| s.current_stats);
            in_flight.fetch_sub(1, Ordering::AcqRel);
            // The receiver going away just means the app is shutting down
            let _ = sender.send(PollResult {
                seq,
                snapshot,
                stats,
            });
        });

        seq
    }

    /// Non-blocking drain of one completed poll, arrival order
    pub fn try_recv(&self) -> Option<PollResult> {
        self.receiver.try_recv().ok()
    }
}
