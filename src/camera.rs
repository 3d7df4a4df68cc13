use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Perspective projection parameters. The view comes from the owning node,
/// which looks down its local -Z axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
        }
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov.to_radians(),
            self.aspect.max(0.01),
            self.near,
            self.far,
        )
    }

    /// Combines the projection with the view implied by `world`, the camera
    /// node's world matrix.
    pub fn view_proj(&self, world: Mat4) -> Mat4 {
        self.projection() * world.inverse()
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(75.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

/// Unit forward vector of a camera whose world matrix is `world`.
pub fn forward_from_world(world: Mat4) -> Vec3 {
    let forward = world.transform_vector3(Vec3::NEG_Z);
    if forward.length_squared() > f32::EPSILON {
        forward.normalize()
    } else {
        Vec3::NEG_Z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::{EulerRot, Quat, Vec4Swizzles};

    #[test]
    fn identity_camera_looks_down_negative_z() {
        assert_eq!(forward_from_world(Mat4::IDENTITY), Vec3::NEG_Z);
    }

    #[test]
    fn half_turn_faces_positive_z() {
        let world = Mat4::from_quat(Quat::from_euler(EulerRot::XYZ, 0.0, std::f32::consts::PI, 0.0));
        let forward = forward_from_world(world);
        assert_relative_eq!(forward.z, 1.0, epsilon = 1e-6);
        assert_relative_eq!(forward.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn scaled_world_still_yields_unit_forward() {
        let world = Mat4::from_scale(Vec3::splat(3.0));
        assert_relative_eq!(forward_from_world(world).length(), 1.0);
    }

    #[test]
    fn point_ahead_projects_to_screen_center() {
        let camera = PerspectiveCamera::default();
        let world = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let clip = camera.view_proj(world) * Vec3::new(1.0, 2.0, -7.0).extend(1.0);
        let ndc = clip.xyz() / clip.w;
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
