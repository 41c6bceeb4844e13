//! Crossway Net - simulation server plumbing
//!
//! A blocking HTTP client for the simulation server's endpoints, plus a
//! background poller that keeps network latency off the render thread by
//! running step+fetch cycles on worker threads and handing results back
//! over a channel, each tagged with a monotonically increasing issue
//! sequence number.

mod client;
mod poller;

pub use client::SimClient;
pub use poller::{PollResult, Poller};
