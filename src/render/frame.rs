use glam::{Mat4, Vec3};

use crate::light::Light;
use crate::scene::{GeometryId, MaterialId, NodeId, NodeKind, Scene, SceneError};

/// Camera and lighting state consumed by the renderer's uniform buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameGlobals {
    pub view_proj: Mat4,
    pub camera_position: Vec3,
    /// Sum of all ambient lights. May be negative.
    pub ambient: Vec3,
    pub point: Option<PointParams>,
    pub spot: Option<SpotParams>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointParams {
    pub position: Vec3,
    pub radiance: Vec3,
    pub distance: f32,
    pub decay: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotParams {
    pub position: Vec3,
    pub direction: Vec3,
    pub radiance: Vec3,
    pub cos_outer: f32,
    pub cos_inner: f32,
    pub distance: f32,
    pub decay: f32,
}

impl FrameGlobals {
    /// Gathers the uniforms for drawing `scene` from the camera at `camera`.
    /// Only the first point light and the first spot light are used.
    pub fn from_scene(scene: &Scene, camera: NodeId) -> Result<Self, SceneError> {
        let projection = match scene.get(camera).map(|node| &node.kind) {
            Some(NodeKind::Camera(projection)) => *projection,
            Some(_) => return Err(SceneError::NotACamera(camera)),
            None => return Err(SceneError::UnknownNode(camera)),
        };
        let camera_world = scene.world_matrix(camera);

        let mut ambient = Vec3::ZERO;
        let mut point = None;
        let mut spot = None;
        for (id, node) in scene.nodes() {
            if !node.visible {
                continue;
            }
            let NodeKind::Light(light) = &node.kind else {
                continue;
            };
            match light {
                Light::Ambient(light) => ambient += light.contribution(),
                Light::Point(light) if point.is_none() => {
                    point = Some(PointParams {
                        position: scene.world_position(id),
                        radiance: light.color * light.intensity,
                        distance: light.distance,
                        decay: light.decay,
                    });
                }
                Light::Spot(light) if spot.is_none() => {
                    let position = scene.world_position(id);
                    let aim = scene.world_position(light.target) - position;
                    let direction = if aim.length_squared() > f32::EPSILON {
                        aim.normalize()
                    } else {
                        Vec3::NEG_Z
                    };
                    let (cos_outer, cos_inner) = light.cone_cosines();
                    spot = Some(SpotParams {
                        position,
                        direction,
                        radiance: light.color * light.intensity,
                        cos_outer,
                        cos_inner,
                        distance: light.distance,
                        decay: light.decay,
                    });
                }
                _ => {}
            }
        }

        Ok(Self {
            view_proj: projection.view_proj(camera_world),
            camera_position: camera_world.w_axis.truncate(),
            ambient,
            point,
            spot,
        })
    }
}

/// One mesh to draw this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub model: Mat4,
}

/// Lists visible meshes. A node hidden with `visible = false` hides its
/// subtree; fully transparent materials are skipped.
pub fn draw_list(scene: &Scene) -> Vec<DrawItem> {
    scene
        .nodes()
        .filter(|(id, node)| {
            node.visible && scene.ancestors(*id).all(|ancestor| scene[ancestor].visible)
        })
        .filter_map(|(id, node)| match node.kind {
            NodeKind::Mesh { geometry, material } if !scene.material(material).is_invisible() => {
                Some(DrawItem {
                    node: id,
                    geometry,
                    material,
                    model: scene.world_matrix(id),
                })
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walkthrough::{Walkthrough, GLINT_DISTANCE};
    use approx::assert_relative_eq;

    #[test]
    fn spot_points_at_its_target() {
        let mut walk = Walkthrough::new(1.5).unwrap();
        walk.update();
        let globals = FrameGlobals::from_scene(walk.scene(), walk.camera()).unwrap();
        let spot = globals.spot.expect("flashlight present");
        let forward = walk.scene().camera_world_direction(walk.camera()).unwrap();
        assert_relative_eq!(spot.direction.dot(forward), 1.0, epsilon = 1e-5);
        assert_eq!(spot.position, globals.camera_position);
        assert_relative_eq!(spot.radiance.x, 5.0);
        let aim = walk.scene().world_position(walk.handles().glint) - spot.position;
        assert_relative_eq!(aim.length(), GLINT_DISTANCE, epsilon = 1e-5);
    }

    #[test]
    fn ambient_lights_are_summed() {
        let walk = Walkthrough::new(1.5).unwrap();
        let globals = FrameGlobals::from_scene(walk.scene(), walk.camera()).unwrap();
        assert_relative_eq!(globals.ambient.x, -0.022, epsilon = 1e-6);
        let point = globals.point.expect("general light present");
        assert_relative_eq!(point.radiance.y, 1.3);
    }

    #[test]
    fn non_camera_is_rejected() {
        let walk = Walkthrough::new(1.5).unwrap();
        let floor = walk.handles().floor;
        assert_eq!(
            FrameGlobals::from_scene(walk.scene(), floor),
            Err(SceneError::NotACamera(floor))
        );
    }

    #[test]
    fn hidden_glint_is_not_drawn() {
        let mut walk = Walkthrough::new(1.5).unwrap();
        let glint = walk.handles().glint;
        assert!(draw_list(walk.scene()).iter().any(|item| item.node == glint));
        walk.update();
        let items = draw_list(walk.scene());
        assert!(items.iter().all(|item| item.node != glint));
        assert!(items.iter().any(|item| item.node == walk.handles().entity));
    }

    #[test]
    fn invisible_parent_hides_children() {
        let mut walk = Walkthrough::new(1.5).unwrap();
        let h = *walk.handles();
        walk.scene_mut()[h.right_wall].visible = false;
        let items = draw_list(walk.scene());
        for hidden in [h.right_wall, h.door_1, h.door_2] {
            assert!(items.iter().all(|item| item.node != hidden));
        }
        assert!(items.iter().any(|item| item.node == h.left_wall));
    }
}
