//! First-person room walkthrough with a camera-following flashlight.
//!
//! The crate keeps the scene graph, the per-frame update and the frame
//! extraction free of any window or GPU handle so they can be driven and
//! tested headless. [`render::Renderer`] is the wgpu host that draws a
//! [`Scene`] once per display refresh.

pub mod app;
pub mod camera;
pub mod geometry;
pub mod light;
pub mod material;
pub mod render;
pub mod scene;
pub mod walkthrough;

pub use camera::PerspectiveCamera;
pub use geometry::{Geometry, GeometryError, MeshData};
pub use light::{AmbientLight, Light, PointLight, SpotLight};
pub use material::{Material, Shading, Side, TextureMap};
pub use render::{FrameGlobals, Renderer};
pub use scene::{GeometryId, MaterialId, NodeId, NodeKind, Pose, Scene, SceneError, SceneNode};
pub use walkthrough::{RoomHandles, Walkthrough, ENTITY_STEP, GLINT_DISTANCE};
