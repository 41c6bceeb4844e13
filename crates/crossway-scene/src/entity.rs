//! Entity records
//!
//! A single record type covers every renderable kind; per-kind state lives
//! in the [`KindData`] tag and behavior dispatches on it. Wheels are owned
//! sub-entities of a vehicle and never enter the pool on their own.

use crate::snapshot::{Heading, SignalState};
use crossway_core::{Color, Material, Transform, Vec3};

/// How many render frames a position update is smoothed over
pub const DEFAULT_CYCLE_FRAMES: u32 = 30;

/// Vertical offset applied to reported vehicle positions so car bodies sit
/// on the road surface instead of intersecting it
pub const VEHICLE_LIFT: f32 = 0.1;

/// Relative wheel offsets from the vehicle origin: front-left, front-right,
/// rear-left, rear-right. Fixed for the vehicle's lifetime.
pub const WHEEL_OFFSETS: [Vec3; 4] = [
    Vec3::new(0.3, 0.05, -0.25),
    Vec3::new(0.3, 0.05, 0.25),
    Vec3::new(-0.3, 0.05, -0.25),
    Vec3::new(-0.3, 0.05, 0.25),
];

/// The closed set of renderable kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Vehicle,
    TrafficLight,
    Road,
    Building,
    Destination,
    Wheel,
}

/// Frame interpolation state for a moving entity.
///
/// `frame_in_cycle` counts up to `total_cycle_frames` and saturates there;
/// at the bound the interpolated position equals `end` exactly and holds
/// until the next retarget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub start: Vec3,
    pub end: Vec3,
    pub frame_in_cycle: u32,
    pub total_cycle_frames: u32,
}

impl Motion {
    /// Motion at rest: start == end == `position`
    pub fn at(position: Vec3, total_cycle_frames: u32) -> Self {
        Self {
            start: position,
            end: position,
            frame_in_cycle: 0,
            total_cycle_frames: total_cycle_frames.max(1),
        }
    }

    /// Restart the cycle toward a new target
    pub fn retarget(&mut self, from: Vec3, to: Vec3) {
        self.start = from;
        self.end = to;
        self.frame_in_cycle = 0;
    }

    /// Advance one frame and return the interpolated position
    pub fn advance(&mut self) -> Vec3 {
        if self.frame_in_cycle < self.total_cycle_frames {
            self.frame_in_cycle += 1;
        }
        self.position()
    }

    /// Position at the current cycle frame
    pub fn position(&self) -> Vec3 {
        if self.frame_in_cycle >= self.total_cycle_frames {
            return self.end;
        }
        let t = self.frame_in_cycle as f32 / self.total_cycle_frames as f32;
        Vec3::lerp(self.start, self.end, t)
    }

    /// True once the cycle has run to completion
    pub fn converged(&self) -> bool {
        self.frame_in_cycle >= self.total_cycle_frames
    }
}

/// A wheel owned by a vehicle; its position is a fixed offset from the
/// vehicle origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wheel {
    pub offset: Vec3,
}

impl Wheel {
    /// The four wheels every vehicle is created with
    pub fn standard_set() -> [Wheel; 4] {
        WHEEL_OFFSETS.map(|offset| Wheel { offset })
    }
}

/// Per-kind entity state
#[derive(Clone, Debug)]
pub enum KindData {
    Vehicle {
        motion: Motion,
        heading: Heading,
        wheels: [Wheel; 4],
    },
    TrafficLight {
        state: SignalState,
        orientation: Heading,
    },
    Road {
        direction: Heading,
    },
    Building,
    Destination,
}

impl KindData {
    /// Vehicle data at rest at `position`
    pub fn vehicle_at(position: Vec3, heading: Heading, total_cycle_frames: u32) -> Self {
        KindData::Vehicle {
            motion: Motion::at(position, total_cycle_frames),
            heading,
            wheels: Wheel::standard_set(),
        }
    }
}

/// A renderable entity: identity, transform, visuals, and kind state
#[derive(Clone, Debug)]
pub struct Entity {
    /// Server-assigned identifier, unique within the entity's kind
    pub id: String,
    pub transform: Transform,
    pub color: Color,
    pub material: Material,
    pub data: KindData,
}

impl Entity {
    pub fn new(id: impl Into<String>, data: KindData) -> Self {
        Self {
            id: id.into(),
            transform: Transform::default(),
            color: Color::WHITE,
            material: Material::default(),
            data,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self.data {
            KindData::Vehicle { .. } => EntityKind::Vehicle,
            KindData::TrafficLight { .. } => EntityKind::TrafficLight,
            KindData::Road { .. } => EntityKind::Road,
            KindData::Building => EntityKind::Building,
            KindData::Destination => EntityKind::Destination,
        }
    }

    /// The entity's local-to-world matrix, recomputed from the transform
    pub fn world_matrix(&self) -> [[f32; 4]; 4] {
        self.transform.to_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_converges_exactly() {
        let mut motion = Motion::at(Vec3::ZERO, 30);
        motion.retarget(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0));

        for frame in 1..=30 {
            let pos = motion.advance();
            if frame == 15 {
                assert_eq!(pos.x, 1.5);
            }
        }
        assert_eq!(motion.position(), Vec3::new(3.0, 0.0, 0.0));
        assert!(motion.converged());

        // Further frames hold the endpoint with no overshoot
        for _ in 0..10 {
            assert_eq!(motion.advance(), Vec3::new(3.0, 0.0, 0.0));
        }
    }

    #[test]
    fn motion_at_rest_stays_put() {
        let mut motion = Motion::at(Vec3::new(2.0, 1.0, 2.0), 30);
        for _ in 0..5 {
            assert_eq!(motion.advance(), Vec3::new(2.0, 1.0, 2.0));
        }
    }

    #[test]
    fn zero_cycle_is_clamped() {
        let motion = Motion::at(Vec3::ZERO, 0);
        assert_eq!(motion.total_cycle_frames, 1);
    }

    #[test]
    fn kind_follows_data() {
        let e = Entity::new("b1", KindData::Building);
        assert_eq!(e.kind(), EntityKind::Building);
        let v = Entity::new(
            "v1",
            KindData::vehicle_at(Vec3::ZERO, Heading::Right, DEFAULT_CYCLE_FRAMES),
        );
        assert_eq!(v.kind(), EntityKind::Vehicle);
    }

    #[test]
    fn every_vehicle_owns_four_wheels() {
        let v = Entity::new(
            "v1",
            KindData::vehicle_at(Vec3::ZERO, Heading::Right, DEFAULT_CYCLE_FRAMES),
        );
        let KindData::Vehicle { wheels, .. } = &v.data else {
            panic!("expected vehicle data");
        };
        assert_eq!(wheels.len(), 4);
        for (wheel, offset) in wheels.iter().zip(WHEEL_OFFSETS) {
            assert_eq!(wheel.offset, offset);
        }
    }
}
