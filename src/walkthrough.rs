//! The room walkthrough: builds the scene once and re-poses it every frame.
//!
//! Static geometry is re-assigned its pose on every [`Walkthrough::update`]
//! call rather than once at startup, so any stray mutation between frames is
//! undone on the next one.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;
use log::{debug, info, warn};

use crate::camera::PerspectiveCamera;
use crate::geometry::Geometry;
use crate::light::{AmbientLight, Light, PointLight, SpotLight};
use crate::material::{Material, TextureMap};
use crate::scene::{MaterialId, NodeId, NodeKind, Pose, Scene, SceneError};

/// Distance from the camera at which the flashlight aim point is held.
pub const GLINT_DISTANCE: f32 = 2.15;
/// Depth the entity sprite loses on every frame.
pub const ENTITY_STEP: f64 = 0.012;
pub const ENTITY_START: Vec3 = Vec3::new(0.0, 0.0, 10.0);
pub const CAMERA_START: Vec3 = Vec3::new(0.01, 0.01, 0.0);

const FLOOR_TEXTURE: &str = "assets/textures/floor.jpg";
const WALL_TEXTURE: &str = "assets/textures/walls.jpg";
const LOGO_TEXTURE: &str = "assets/textures/logo.png";
const DOOR_TEXTURE: &str = "assets/textures/door.png";
const ENTITY_TEXTURE: &str = "assets/textures/surprise.png";

const fn pose(position: Vec3, rotation: Vec3) -> Pose {
    Pose {
        position,
        rotation,
        scale: Vec3::ONE,
    }
}

const FLOOR_POSE: Pose = pose(Vec3::new(0.0, -3.3, 6.8), Vec3::new(-FRAC_PI_2, 0.0, 0.0));
const CEILING_POSE: Pose = pose(Vec3::new(0.0, 3.6, 3.3), Vec3::new(FRAC_PI_2, 0.0, 0.0));
const LAMP_POSE: Pose = pose(Vec3::new(0.0, -3.0, 0.4), Vec3::ZERO);
const FRONT_WALL_POSE: Pose = pose(Vec3::new(0.0, 0.0, -15.7), Vec3::ZERO);
const BACK_WALL_POSE: Pose = pose(Vec3::new(0.0, 0.0, 20.7), Vec3::ZERO);
const LEFT_WALL_POSE: Pose = pose(Vec3::new(-4.65, 0.0, 2.2), Vec3::new(0.0, -FRAC_PI_2, 0.0));
const LOGO_POSE: Pose = pose(Vec3::new(0.0, 0.0, -0.1), Vec3::new(0.0, PI, 0.0));
const RIGHT_WALL_POSE: Pose = pose(Vec3::new(4.65, 0.0, 2.2), Vec3::new(0.0, -FRAC_PI_2, 0.0));
const DOOR_1_POSE: Pose = pose(Vec3::new(3.2, -0.5, 0.5), Vec3::ZERO);
const DOOR_2_POSE: Pose = pose(Vec3::new(-3.2, -0.5, 0.5), Vec3::ZERO);

/// Handles to every node the per-frame update touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomHandles {
    pub camera: NodeId,
    pub floor: NodeId,
    pub ceiling: NodeId,
    pub lamp: NodeId,
    pub front_wall: NodeId,
    pub back_wall: NodeId,
    pub left_wall: NodeId,
    pub logo: NodeId,
    pub right_wall: NodeId,
    pub door_1: NodeId,
    pub door_2: NodeId,
    pub entity: NodeId,
    pub glint: NodeId,
    pub glint_material: MaterialId,
    pub flashlight: NodeId,
    pub general_light: NodeId,
}

impl RoomHandles {
    /// Nodes whose pose is fixed, paired with that pose.
    pub fn static_poses(&self) -> [(NodeId, Pose); 10] {
        [
            (self.floor, FLOOR_POSE),
            (self.ceiling, CEILING_POSE),
            (self.lamp, LAMP_POSE),
            (self.front_wall, FRONT_WALL_POSE),
            (self.back_wall, BACK_WALL_POSE),
            (self.left_wall, LEFT_WALL_POSE),
            (self.logo, LOGO_POSE),
            (self.right_wall, RIGHT_WALL_POSE),
            (self.door_1, DOOR_1_POSE),
            (self.door_2, DOOR_2_POSE),
        ]
    }
}

/// Scene controller owning the room and the frame counter.
#[derive(Debug, Clone)]
pub struct Walkthrough {
    scene: Scene,
    handles: RoomHandles,
    frames: u64,
    /// Authoritative entity depth. The pose only holds its `f32` rounding,
    /// which stops resolving the per-frame step once the sprite is far away.
    entity_depth: f64,
}

impl Walkthrough {
    /// Builds the room for a viewport with the given aspect ratio.
    pub fn new(aspect: f32) -> Result<Self, SceneError> {
        let mut scene = Scene::new();
        let handles = build_room(&mut scene, aspect)?;
        info!("Built walkthrough scene with {} nodes", scene.len());
        Ok(Self {
            scene,
            handles,
            frames: 0,
            entity_depth: f64::from(ENTITY_START.z),
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access for hosts that move the camera between frames.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn handles(&self) -> &RoomHandles {
        &self.handles
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn entity_depth(&self) -> f64 {
        self.entity_depth
    }

    pub fn camera(&self) -> NodeId {
        self.handles.camera
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if let NodeKind::Camera(camera) = &mut self.scene[self.handles.camera].kind {
            camera.aspect = aspect;
        }
    }

    /// Advances the scene by one frame.
    pub fn update(&mut self) {
        let h = self.handles;
        let scene = &mut self.scene;

        for (id, pose) in h.static_poses() {
            scene[id].pose = pose;
        }

        self.entity_depth -= ENTITY_STEP;
        scene[h.entity].pose.position.z = self.entity_depth as f32;

        let camera_position = scene.world_position(h.camera);
        let forward = match scene.camera_world_direction(h.camera) {
            Ok(forward) => forward,
            Err(err) => {
                warn!("{err}; holding the glint along -Z");
                Vec3::NEG_Z
            }
        };
        let glint_position = camera_position + forward * GLINT_DISTANCE;
        scene[h.glint].pose.position = glint_position;

        let glint = scene.material_mut(h.glint_material);
        glint.transparent = true;
        glint.opacity = 0.0;

        scene[h.flashlight].pose.position = camera_position;
        if let Some(target) = spot_target(scene, h.flashlight) {
            scene[target].pose.position = glint_position;
        }

        self.frames += 1;
        debug!(
            "frame {}: glint=({:.2}, {:.2}, {:.2}) entity z={:.3}",
            self.frames,
            glint_position.x,
            glint_position.y,
            glint_position.z,
            self.entity_depth
        );
    }

    /// Tears the controller down and hands back the scene.
    pub fn shutdown(self) -> Scene {
        info!("Walkthrough stopped after {} frame(s)", self.frames);
        self.scene
    }
}

fn spot_target(scene: &Scene, light: NodeId) -> Option<NodeId> {
    match &scene[light].kind {
        NodeKind::Light(Light::Spot(spot)) => Some(spot.target),
        _ => None,
    }
}

fn build_room(scene: &mut Scene, aspect: f32) -> Result<RoomHandles, SceneError> {
    let camera = scene.add_camera("camera", PerspectiveCamera::new(75.0, aspect, 0.1, 1000.0));
    scene[camera].pose.position = CAMERA_START;

    let floor_geometry = scene.add_geometry(Geometry::plane(40.0, 50.0))?;
    let floor_material = scene.add_material(
        Material::standard()
            .with_map(TextureMap::tiled(FLOOR_TEXTURE, 8.0, 8.0))
            .double_sided(),
    );
    let floor = scene.add_mesh("floor", floor_geometry, floor_material);

    let ceiling_geometry = scene.add_geometry(Geometry::plane(25.0, 50.0))?;
    let ceiling_material =
        scene.add_material(Material::standard().with_color(0x5A2800).double_sided());
    let ceiling = scene.add_mesh("ceiling", ceiling_geometry, ceiling_material);

    let lamp_geometry = scene.add_geometry(Geometry::cylinder(0.3, 0.3, 3.7, 32))?;
    let lamp_material = scene.add_material(
        Material::standard()
            .with_color(0xFFFFFF)
            .with_emissive(0xFFFFFF, 0.2)
            .double_sided(),
    );
    let lamp = scene.add_mesh("ceiling lamp", lamp_geometry, lamp_material);
    scene.attach(ceiling, lamp)?;

    // The lamp has no pose yet when the light is placed, so it sits at the origin.
    let general_light = scene.add_light("general light", Light::Point(PointLight::new(0xFFFFFF, 1.3)));
    let lamp_position = scene[lamp].pose.position;
    scene[general_light].pose.position = lamp_position;
    scene.add_light("ambient fill", Light::Ambient(AmbientLight::new(0x000000, -0.6)));
    scene.add_light("vision limit", Light::Ambient(AmbientLight::new(0xFFFFFF, -0.022)));

    let wall_material = scene.add_material(
        Material::lambert()
            .with_map(TextureMap::tiled(WALL_TEXTURE, 8.0, 1.5))
            .double_sided(),
    );
    let long_wall = scene.add_geometry(Geometry::plane(32.0, 7.0))?;
    let short_wall = scene.add_geometry(Geometry::plane(17.0, 7.0))?;
    let front_wall = scene.add_mesh("front wall", long_wall, wall_material);
    let back_wall = scene.add_mesh("back wall", long_wall, wall_material);

    let left_wall = scene.add_mesh("left wall", short_wall, wall_material);
    let logo_geometry = scene.add_geometry(Geometry::plane(4.0, 2.5))?;
    let logo_material = scene.add_material(
        Material::phong()
            .with_map(TextureMap::new(LOGO_TEXTURE))
            .with_shininess(500.0)
            .double_sided(),
    );
    let logo = scene.add_mesh("logo", logo_geometry, logo_material);
    scene.attach(left_wall, logo)?;

    let right_wall = scene.add_mesh("right wall", short_wall, wall_material);
    let door_geometry = scene.add_geometry(Geometry::plane(2.0, 5.0))?;
    let door_material = scene.add_material(
        Material::phong()
            .with_map(TextureMap::new(DOOR_TEXTURE))
            .with_shininess(200.0)
            .double_sided(),
    );
    let door_1 = scene.add_mesh("door 1", door_geometry, door_material);
    let door_2 = scene.add_mesh("door 2", door_geometry, door_material);
    scene.attach(right_wall, door_1)?;
    scene.attach(right_wall, door_2)?;

    let entity_geometry = scene.add_geometry(Geometry::plane(0.8, 1.6))?;
    let entity_material = scene.add_material(
        Material::lambert()
            .with_map(TextureMap::new(ENTITY_TEXTURE))
            .with_color(0x2E2E28)
            .double_sided(),
    );
    let entity = scene.add_mesh("entity", entity_geometry, entity_material);
    scene[entity].pose.position = ENTITY_START;

    let glint_geometry = scene.add_geometry(Geometry::sphere(0.05, 32, 16))?;
    let glint_material = scene.add_material(
        Material::standard()
            .with_color(0xFFFFFF)
            .with_emissive(0xFFFFFF, 0.7)
            .double_sided(),
    );
    let glint = scene.add_mesh("glint", glint_geometry, glint_material);
    scene[glint].pose.position = Vec3::new(0.0, 1.0, 2.0);

    let spot = SpotLight::new(0xFFFFFF, 5.0, glint).with_cone(100.0, PI / 5.5, 2.0, 1.8);
    let flashlight = scene.add_light("flashlight", Light::Spot(spot));

    Ok(RoomHandles {
        camera,
        floor,
        ceiling,
        lamp,
        front_wall,
        back_wall,
        left_wall,
        logo,
        right_wall,
        door_1,
        door_2,
        entity,
        glint,
        glint_material,
        flashlight,
        general_light,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn walkthrough() -> Walkthrough {
        Walkthrough::new(16.0 / 9.0).unwrap()
    }

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
    }

    #[test]
    fn flashlight_tracks_camera_every_frame() {
        let mut walk = walkthrough();
        let camera = walk.camera();
        for frame in 0..50 {
            walk.scene_mut()[camera].pose.rotation.y = frame as f32 * 0.1;
            walk.scene_mut()[camera].pose.position.x = frame as f32 * 0.05;
            walk.update();

            let scene = walk.scene();
            let h = walk.handles();
            let camera_position = scene.world_position(camera);
            let forward = scene.camera_world_direction(camera).unwrap();
            assert_vec_eq(scene.world_position(h.flashlight), camera_position);
            assert_vec_eq(
                scene.world_position(h.glint),
                camera_position + forward * GLINT_DISTANCE,
            );
            assert_vec_eq(
                scene.world_position(spot_target(scene, h.flashlight).unwrap()),
                scene.world_position(h.glint),
            );
        }
    }

    #[test]
    fn glint_is_hidden_every_frame() {
        let mut walk = walkthrough();
        let material = walk.handles().glint_material;
        assert!(!walk.scene().material(material).transparent);
        for _ in 0..3 {
            walk.scene_mut().material_mut(material).opacity = 1.0;
            walk.update();
            let glint = walk.scene().material(material);
            assert!(glint.transparent);
            assert_eq!(glint.opacity, 0.0);
            assert!(glint.is_invisible());
        }
    }

    #[test]
    fn entity_drifts_at_constant_speed() {
        let mut walk = walkthrough();
        let entity = walk.handles().entity;
        walk.update();
        assert_relative_eq!(walk.scene()[entity].pose.position.z, (10.0 - ENTITY_STEP) as f32);
        for _ in 1..1000 {
            walk.update();
        }
        assert_eq!(walk.frame_count(), 1000);
        let z = walk.scene()[entity].pose.position.z;
        assert_relative_eq!(z, (10.0 - ENTITY_STEP * 1000.0) as f32, epsilon = 1e-4);
        assert!(z < 0.0, "the sprite keeps going past the camera");
    }

    #[test]
    fn entity_depth_does_not_drift_over_long_runs() {
        let mut walk = walkthrough();
        let entity = walk.handles().entity;
        let frames = 200_000;
        for _ in 0..frames {
            walk.update();
        }
        let expected = 10.0 - ENTITY_STEP * frames as f64;
        assert_relative_eq!(walk.entity_depth(), expected, epsilon = 1e-6);
        assert_relative_eq!(
            walk.scene()[entity].pose.position.z,
            expected as f32,
            epsilon = 1e-3
        );
    }

    #[test]
    fn entity_keeps_receding_far_from_the_camera() {
        let mut walk = walkthrough();
        walk.entity_depth = -300_000.0;
        for _ in 0..10 {
            let before = walk.entity_depth();
            walk.update();
            assert!(walk.entity_depth() < before);
            assert_relative_eq!(walk.entity_depth(), before - ENTITY_STEP, epsilon = 1e-9);
        }
        let z = walk.scene()[walk.handles().entity].pose.position.z;
        assert_relative_eq!(z, (-300_000.0 - ENTITY_STEP * 10.0) as f32);
    }

    #[test]
    fn glint_falls_back_to_negative_z_without_a_camera() {
        let mut walk = walkthrough();
        let camera = walk.camera();
        walk.scene_mut()[camera].kind = NodeKind::Group;
        walk.update();
        let scene = walk.scene();
        assert_vec_eq(
            scene.world_position(walk.handles().glint),
            CAMERA_START + Vec3::NEG_Z * GLINT_DISTANCE,
        );
        assert_vec_eq(scene.world_position(walk.handles().flashlight), CAMERA_START);
    }

    #[test]
    fn static_poses_do_not_change_between_frames() {
        let mut walk = walkthrough();
        walk.update();
        let first: Vec<_> = walk
            .handles()
            .static_poses()
            .iter()
            .map(|(id, _)| walk.scene().world_matrix(*id))
            .collect();
        for _ in 1..1000 {
            walk.update();
        }
        let last: Vec<_> = walk
            .handles()
            .static_poses()
            .iter()
            .map(|(id, _)| walk.scene().world_matrix(*id))
            .collect();
        assert_eq!(first, last);
    }

    #[test]
    fn stray_mutations_are_undone_next_frame() {
        let mut walk = walkthrough();
        walk.update();
        let floor = walk.handles().floor;
        let expected = walk.scene()[floor].pose;
        walk.scene_mut()[floor].pose.position = Vec3::new(5.0, 5.0, 5.0);
        walk.scene_mut()[floor].pose.rotation = Vec3::ZERO;
        walk.update();
        assert_eq!(walk.scene()[floor].pose, expected);
        assert_relative_eq!(expected.position.y, -3.3);
        assert_relative_eq!(expected.rotation.x, -FRAC_PI_2);
    }

    #[test]
    fn camera_facing_positive_z_holds_glint_ahead() {
        let mut walk = walkthrough();
        let camera = walk.camera();
        walk.scene_mut()[camera].pose.position = Vec3::ZERO;
        walk.scene_mut()[camera].pose.rotation = Vec3::new(0.0, PI, 0.0);
        let glint = walk.handles().glint;

        walk.update();
        let first = walk.scene().world_position(glint);
        assert_vec_eq(first, Vec3::new(0.0, 0.0, 2.15));

        walk.update();
        assert_eq!(walk.scene().world_position(glint), first);
    }

    #[test]
    fn room_layout_matches_the_plan() {
        let mut walk = walkthrough();
        walk.update();
        let scene = walk.scene();
        let h = walk.handles();
        assert_eq!(scene[h.lamp].parent(), Some(h.ceiling));
        assert_eq!(scene[h.logo].parent(), Some(h.left_wall));
        assert_eq!(scene[h.right_wall].children(), &[h.door_1, h.door_2]);
        assert_eq!(scene.world_position(h.general_light), Vec3::ZERO);

        // The ceiling is rotated a quarter turn, so the lamp's local -Y drop
        // becomes a shift along world Z.
        let lamp = scene.world_position(h.lamp);
        assert_relative_eq!(lamp.y, 3.6 - 0.4, epsilon = 1e-5);
        assert_relative_eq!(lamp.z, 3.3 - 3.0, epsilon = 1e-5);

        assert_eq!(scene.find("entity"), Some(h.entity));
        assert_eq!(scene.find("flashlight"), Some(h.flashlight));
    }

    #[test]
    fn aspect_follows_resizes() {
        let mut walk = walkthrough();
        walk.set_aspect(2.0);
        match &walk.scene()[walk.camera()].kind {
            NodeKind::Camera(camera) => assert_eq!(camera.aspect, 2.0),
            other => panic!("camera is a {}", other.label()),
        }
    }

    #[test]
    fn shutdown_returns_the_scene() {
        let mut walk = walkthrough();
        let nodes = walk.scene().len();
        walk.update();
        let scene = walk.shutdown();
        assert_eq!(scene.len(), nodes);
    }
}
