//! Mouse-orbit camera.
//!
//! Three scalars fully describe the camera: orbit angle around the Y axis,
//! pitch above the XZ plane (both in degrees), and distance from the origin.
//! The view matrix is rebuilt from them every frame; nothing else persists
//! between frames.

use glam::{Mat4, Vec3};

/// Degrees of rotation per pixel of left-button drag.
const ORBIT_SPEED: f32 = 0.5;
/// Distance units per pixel of right-button drag.
const ZOOM_SPEED: f32 = 0.1;

/// Orbit camera state: angles in degrees, distance in world units.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub orbit: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            orbit: 0.0,
            pitch: 25.0,
            distance: 4.0,
        }
    }
}

impl OrbitCamera {
    /// Apply a left-drag delta. Pitch is clamped so the camera never flips
    /// over the poles.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.orbit += dx * ORBIT_SPEED;
        self.pitch = (self.pitch + dy * ORBIT_SPEED).clamp(-90.0, 90.0);
    }

    /// Apply a right-drag delta. Distance never goes negative.
    pub fn zoom(&mut self, dy: f32) {
        self.distance = (self.distance + dy * ZOOM_SPEED).max(0.0);
    }

    /// Build the view matrix: push back along Z, then pitch, then orbit.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
            * Mat4::from_rotation_x(self.pitch.to_radians())
            * Mat4::from_rotation_y(self.orbit.to_radians())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_stays_clamped_under_repeated_drags() {
        let mut cam = OrbitCamera::default();
        for _ in 0..1000 {
            cam.rotate(3.0, 17.0);
            assert!(cam.pitch >= -90.0 && cam.pitch <= 90.0);
        }
        assert_eq!(cam.pitch, 90.0);
        for _ in 0..1000 {
            cam.rotate(-3.0, -17.0);
            assert!(cam.pitch >= -90.0 && cam.pitch <= 90.0);
        }
        assert_eq!(cam.pitch, -90.0);
    }

    #[test]
    fn distance_never_goes_negative() {
        let mut cam = OrbitCamera::default();
        for _ in 0..1000 {
            cam.zoom(-5.0);
            assert!(cam.distance >= 0.0);
        }
        assert_eq!(cam.distance, 0.0);
        cam.zoom(10.0);
        assert!(cam.distance > 0.0);
    }

    #[test]
    fn default_view_places_origin_at_working_distance() {
        let cam = OrbitCamera {
            orbit: 0.0,
            pitch: 0.0,
            distance: 4.0,
        };
        let eye_space = cam.view_matrix().transform_point3(Vec3::ZERO);
        assert!((eye_space - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-6);
    }

    #[test]
    fn orbit_rotates_about_y() {
        let cam = OrbitCamera {
            orbit: 90.0,
            pitch: 0.0,
            distance: 0.0,
        };
        // +X rotated a quarter turn about Y lands on -Z.
        let p = cam.view_matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }
}
