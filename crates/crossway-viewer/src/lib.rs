//! Crossway Viewer - the application shell
//!
//! Wires the network poller, reconciler, and renderer into a winit event
//! loop: one-time startup (window, GPU context, meshes, initial fetches)
//! followed by the steady per-frame loop.

pub mod app;
pub mod config;
pub mod scheduler;

pub use app::run;
pub use config::ViewerConfig;
pub use scheduler::PollScheduler;
