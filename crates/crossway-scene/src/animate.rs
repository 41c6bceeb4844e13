//! Transform & interpolation engine
//!
//! Runs once per render frame, before draw-call submission: advances every
//! vehicle's interpolation cycle and writes the resulting position back to
//! its transform. Wheels are rigid followers - their transforms are derived
//! from the owning vehicle on demand, never advanced independently.

use crate::entity::{Entity, KindData};
use crate::pool::ScenePool;
use crossway_core::Transform;

/// Advance interpolated motion for every entity that supports it
pub fn advance_motion(pool: &mut ScenePool) {
    for vehicle in pool.vehicles.iter_mut() {
        if let KindData::Vehicle { motion, .. } = &mut vehicle.data {
            vehicle.transform.position = motion.advance();
        }
    }
}

/// Transforms for a vehicle's four owned wheels at its current position.
///
/// Each wheel sits at `vehicle.position + wheel.offset` with the vehicle's
/// own rotation - wheels snap to the already-interpolated body every frame,
/// so they can never drift. Returns None for non-vehicle entities.
pub fn wheel_transforms(vehicle: &Entity) -> Option<[Transform; 4]> {
    let KindData::Vehicle { wheels, .. } = &vehicle.data else {
        return None;
    };
    Some(wheels.map(|wheel| Transform {
        position: vehicle.transform.position + wheel.offset,
        rotation: vehicle.transform.rotation,
        scale: vehicle.transform.scale,
    }))
}
