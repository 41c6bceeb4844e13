//! Crossway Scene - the reconciled world state
//!
//! Holds the identity-keyed pool of renderable entities, the snapshot wire
//! types fetched from the simulation server, the reconciler that merges
//! snapshots into the pool, and the per-frame transform/interpolation
//! engine that turns discrete server positions into continuous motion.

mod animate;
mod entity;
mod pool;
mod rand;
mod reconcile;
mod snapshot;

pub use animate::{advance_motion, wheel_transforms};
pub use entity::{
    Entity, EntityKind, KindData, Motion, Wheel, DEFAULT_CYCLE_FRAMES, VEHICLE_LIFT, WHEEL_OFFSETS,
};
pub use pool::{Partition, ScenePool};
pub use rand::SceneRng;
pub use reconcile::{heading_yaw, signal_color, Reconciler};
pub use snapshot::{
    AgentRecord, AgentSnapshot, CurrentStats, EnvRecord, EnvironmentPositions,
    EnvironmentSnapshot, Heading, InitRequest, InitResponse, LightRecord, SignalState,
    StatsResponse, StepResponse,
};
