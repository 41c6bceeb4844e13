//! Lightweight xorshift32 PRNG - no external crate needed
//!
//! Drives the stable per-vehicle colors and per-building height jitter.
//! Seeded, so a fixed seed reproduces the same scene appearance.

use crossway_core::Color;

pub struct SceneRng {
    state: u32,
}

impl SceneRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() as f32) / (u32::MAX as f32)
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// A saturated body color for a newly created vehicle. One channel is
    /// forced high and one low so cars never come out gray or near-white.
    pub fn vehicle_color(&mut self) -> Color {
        let mut channels = [
            self.range(0.7, 1.0),
            self.range(0.1, 0.5),
            self.range(0.1, 0.9),
        ];
        // Rotate which channel gets the high value
        let shift = (self.next_u32() % 3) as usize;
        channels.rotate_left(shift);
        Color::new(channels[0], channels[1], channels[2], 1.0)
    }
}
