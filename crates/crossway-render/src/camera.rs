//! Orbit camera
//!
//! The camera orbits a target point - by default the center of the
//! simulation grid reported by the init call. Mouse input adjusts yaw,
//! pitch, distance, and pan; the view-projection matrix is recomputed
//! from these settings every frame.

use crossway_core::{mat4_mul, Vec3};

/// A 3D orbit camera
pub struct Camera {
    /// Camera position, derived from the orbit parameters
    pub position: Vec3,
    /// Target point the camera looks at
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance from target
    pub distance: f32,
    /// Horizontal angle in radians
    pub yaw: f32,
    /// Vertical angle in radians
    pub pitch: f32,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::new(10.0, 10.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::UP,
            fov: 60.0,
            near: 1.0,
            far: 200.0,
            aspect: 16.0 / 9.0,
            distance: 20.0,
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: std::f32::consts::FRAC_PI_6,
        };
        camera.update_orbit();
        camera
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the camera at the center of a width x height grid, backing
    /// off far enough to frame the whole extent.
    pub fn center_on_grid(&mut self, width: u32, height: u32) {
        self.target = Vec3::new(width as f32 / 2.0, 0.0, height as f32 / 2.0);
        self.distance = (width.max(height) as f32).max(10.0) * 1.2;
        self.update_orbit();
    }

    /// Recompute position from the orbit parameters
    pub fn update_orbit(&mut self) {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();

        self.position = Vec3::new(self.target.x + x, self.target.y + y, self.target.z + z);
    }

    /// Orbit horizontally (rotate around target)
    pub fn orbit_horizontal(&mut self, delta: f32) {
        self.yaw += delta;
        self.update_orbit();
    }

    /// Orbit vertically (tilt up/down)
    pub fn orbit_vertical(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(-1.5, 1.5);
        self.update_orbit();
    }

    /// Zoom in/out
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).clamp(2.0, 150.0);
        self.update_orbit();
    }

    /// Pan the camera (move target in the view plane)
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = (self.target - self.position).normalized();
        let right = forward.cross(&self.up).normalized();
        let up = right.cross(&forward);

        self.target = self.target + right * dx + up * dy;
        self.update_orbit();
    }

    /// Get camera position as an array for GPU upload
    pub fn position_array(&self) -> [f32; 3] {
        self.position.to_array()
    }

    /// Get the view matrix (4x4, column-major)
    pub fn view_matrix(&self) -> [[f32; 4]; 4] {
        let f = (self.target - self.position).normalized();
        let s = f.cross(&self.up).normalized();
        let u = s.cross(&f);

        [
            [s.x, u.x, -f.x, 0.0],
            [s.y, u.y, -f.y, 0.0],
            [s.z, u.z, -f.z, 0.0],
            [
                -s.dot(&self.position),
                -u.dot(&self.position),
                f.dot(&self.position),
                1.0,
            ],
        ]
    }

    /// Get the perspective projection matrix (4x4, column-major)
    pub fn projection_matrix(&self) -> [[f32; 4]; 4] {
        let fov_rad = self.fov.to_radians();
        let f = 1.0 / (fov_rad / 2.0).tan();
        let depth = self.far - self.near;

        [
            [f / self.aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, -(self.far + self.near) / depth, -1.0],
            [0.0, 0.0, -(2.0 * self.far * self.near) / depth, 0.0],
        ]
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> [[f32; 4]; 4] {
        let view = self.view_matrix();
        let proj = self.projection_matrix();
        mat4_mul(&proj, &view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_on_grid_targets_the_middle() {
        let mut camera = Camera::new();
        camera.center_on_grid(24, 16);
        assert_eq!(camera.target, Vec3::new(12.0, 0.0, 8.0));
        assert!(camera.distance >= 24.0);
    }

    #[test]
    fn orbit_keeps_distance_to_target() {
        let mut camera = Camera::new();
        camera.center_on_grid(10, 10);
        let before = (camera.position - camera.target).length();
        camera.orbit_horizontal(0.7);
        camera.orbit_vertical(-0.2);
        let after = (camera.position - camera.target).length();
        assert!((before - after).abs() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::new();
        camera.zoom(1e6);
        assert!(camera.distance >= 2.0);
        camera.zoom(-1e6);
        assert!(camera.distance <= 150.0);
    }

    #[test]
    fn target_projects_to_clip_center() {
        let mut camera = Camera::new();
        camera.center_on_grid(20, 20);
        let vp = camera.view_projection_matrix();
        let t = camera.target;
        // Column-major multiply: clip = vp * (t, 1)
        let clip_x = vp[0][0] * t.x + vp[1][0] * t.y + vp[2][0] * t.z + vp[3][0];
        let clip_y = vp[0][1] * t.x + vp[1][1] * t.y + vp[2][1] * t.z + vp[3][1];
        let clip_w = vp[0][3] * t.x + vp[1][3] * t.y + vp[2][3] * t.z + vp[3][3];
        assert!((clip_x / clip_w).abs() < 1e-4);
        assert!((clip_y / clip_w).abs() < 1e-4);
    }
}
