use glam::{Mat4, Quat, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::CameraError;

/// Orbit state of the turntable camera, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Turntable {
    /// Rotation around the X axis (looking up/down)
    pub elevation: f32,
    /// Rotation around the Y axis (spinning the table)
    pub azimuth: f32,
}

impl Turntable {
    pub fn new(elevation: f32, azimuth: f32) -> Self {
        Self {
            elevation,
            azimuth,
        }
    }

    /// Applies a rotation delta, `x` spins the table and `y` tilts it.
    pub fn orbit(&mut self, delta: Vec2) {
        self.azimuth = (self.azimuth + delta.x) % std::f32::consts::TAU;
        self.elevation = (self.elevation + delta.y)
            .clamp(-std::f32::consts::FRAC_PI_2, std::f32::consts::FRAC_PI_2);
    }
}

/// Builds the projection and modelview matrices from camera parameters.
///
/// Both matrices are recomputed from scratch on every call; the builder keeps no
/// matrices of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MvpBuilder {
    pub fov_radians: f32,
    pub near: f32,
    pub far: f32,
    pub width: u32,
    pub height: u32,
    /// Offset of the camera along the view axis
    pub translation_z: f32,
    pub turntable: Turntable,
}

impl Default for MvpBuilder {
    fn default() -> Self {
        Self {
            fov_radians: std::f32::consts::FRAC_PI_2,
            near: 0.01,
            far: 100.0,
            width: 1,
            height: 1,
            translation_z: 0.0,
            turntable: Turntable::default(),
        }
    }
}

impl MvpBuilder {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn validate(&self) -> Result<(), CameraError> {
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(CameraError::ClipPlanes {
                near: self.near,
                far: self.far,
            });
        }

        if !(self.fov_radians > 0.0 && self.fov_radians < std::f32::consts::PI) {
            return Err(CameraError::FieldOfView(self.fov_radians));
        }

        if self.width == 0 || self.height == 0 {
            return Err(CameraError::EmptyViewport {
                width: self.width,
                height: self.height,
            });
        }

        Ok(())
    }

    pub fn build_perspective_projection(&self) -> Result<Mat4, CameraError> {
        self.validate()?;

        Ok(Mat4::perspective_rh_gl(
            self.fov_radians,
            self.aspect_ratio(),
            self.near,
            self.far,
        ))
    }

    pub fn build_turntable_modelview(&self) -> Mat4 {
        Mat4::from_rotation_translation(
            Quat::from_rotation_x(self.turntable.elevation)
                * Quat::from_rotation_y(self.turntable.azimuth),
            glam::vec3(0.0, 0.0, self.translation_z),
        )
    }

    /// Moves the camera along the view axis, staying between the clip planes.
    pub fn zoom(&mut self, delta: f32) {
        self.translation_z = (self.translation_z + delta).clamp(-self.far, -self.near);
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};

    use super::*;

    fn builder(width: u32, height: u32) -> MvpBuilder {
        MvpBuilder {
            width,
            height,
            translation_z: -10.0,
            ..Default::default()
        }
    }

    #[test]
    fn projection_aspect_matches_viewport() {
        for (w, h) in [(800, 600), (1, 1), (1920, 1080), (300, 1200)] {
            let p = builder(w, h).build_perspective_projection().unwrap();
            let aspect = p.y_axis.y / p.x_axis.x;
            assert!((aspect - w as f32 / h as f32).abs() < 1e-4, "{w}x{h}");

            // Perspective divide: w' = -z
            assert_eq!(p.z_axis.w, -1.0);
            assert_eq!(p.w_axis.w, 0.0);
        }
    }

    #[test]
    fn projection_maps_clip_planes() {
        let b = builder(640, 480);
        let p = b.build_perspective_projection().unwrap();

        let near = p * Vec4::new(0.0, 0.0, -b.near, 1.0);
        let far = p * Vec4::new(0.0, 0.0, -b.far, 1.0);
        assert!((near.z / near.w + 1.0).abs() < 1e-3);
        assert!((far.z / far.w - 1.0).abs() < 1e-3);
    }

    #[test]
    fn projection_rejects_invalid_parameters() {
        let mut b = builder(0, 480);
        assert_eq!(
            b.build_perspective_projection(),
            Err(CameraError::EmptyViewport {
                width: 0,
                height: 480
            })
        );

        b.width = 640;
        b.near = 0.0;
        assert!(matches!(
            b.build_perspective_projection(),
            Err(CameraError::ClipPlanes { .. })
        ));

        b.near = 10.0;
        b.far = 5.0;
        assert!(matches!(
            b.build_perspective_projection(),
            Err(CameraError::ClipPlanes { .. })
        ));

        b.far = 100.0;
        b.fov_radians = std::f32::consts::PI;
        assert_eq!(
            b.build_perspective_projection(),
            Err(CameraError::FieldOfView(std::f32::consts::PI))
        );
    }

    #[test]
    fn modelview_without_rotation_is_a_translation() {
        let m = builder(1, 1).build_turntable_modelview();
        assert_eq!(m, Mat4::from_translation(Vec3::new(0.0, 0.0, -10.0)));
    }

    #[test]
    fn modelview_orbits_around_origin() {
        let mut b = builder(1, 1);
        b.turntable.orbit(Vec2::new(std::f32::consts::FRAC_PI_2, 0.0));
        let m = b.build_turntable_modelview();

        // The origin stays in front of the camera whatever the rotation
        let origin = m.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-5);

        // A quarter turn pushes +X away from the viewer
        let x = m.transform_point3(Vec3::X);
        assert!((x - Vec3::new(0.0, 0.0, -11.0)).length() < 1e-5);
    }

    #[test]
    fn orbit_clamps_elevation() {
        let mut t = Turntable::default();
        t.orbit(Vec2::new(0.0, 10.0));
        assert_eq!(t.elevation, std::f32::consts::FRAC_PI_2);
        t.orbit(Vec2::new(0.0, -20.0));
        assert_eq!(t.elevation, -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn zoom_stays_between_clip_planes() {
        let mut b = builder(1, 1);
        b.zoom(-1000.0);
        assert_eq!(b.translation_z, -b.far);
        b.zoom(1000.0);
        assert_eq!(b.translation_z, -b.near);
    }
}
