use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::material::color_from_hex;
use crate::scene::NodeId;

/// Light attached to a scene node. Position comes from the node pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Light {
    Point(PointLight),
    /// Uniform term added to every surface; negative intensities darken.
    Ambient(AmbientLight),
    Spot(SpotLight),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub color: Vec3,
    pub intensity: f32,
    /// Range after which the light contributes nothing. Zero means unlimited.
    pub distance: f32,
    pub decay: f32,
}

impl PointLight {
    pub fn new(hex: u32, intensity: f32) -> Self {
        Self {
            color: color_from_hex(hex),
            intensity,
            distance: 0.0,
            decay: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(hex: u32, intensity: f32) -> Self {
        Self {
            color: color_from_hex(hex),
            intensity,
        }
    }

    pub fn contribution(&self) -> Vec3 {
        self.color * self.intensity
    }
}

/// Cone light aimed at the world position of its `target` node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotLight {
    pub color: Vec3,
    pub intensity: f32,
    pub distance: f32,
    /// Half angle of the cone in radians.
    pub angle: f32,
    /// Fraction of the cone that fades out. Values above one behave as one.
    pub penumbra: f32,
    pub decay: f32,
    pub target: NodeId,
}

impl SpotLight {
    pub fn new(hex: u32, intensity: f32, target: NodeId) -> Self {
        Self {
            color: color_from_hex(hex),
            intensity,
            distance: 0.0,
            angle: std::f32::consts::FRAC_PI_3,
            penumbra: 0.0,
            decay: 2.0,
            target,
        }
    }

    pub fn with_cone(mut self, distance: f32, angle: f32, penumbra: f32, decay: f32) -> Self {
        self.distance = distance;
        self.angle = angle;
        self.penumbra = penumbra;
        self.decay = decay;
        self
    }

    /// Cosines of the outer and inner cone limits, outer first.
    pub fn cone_cosines(&self) -> (f32, f32) {
        let outer = self.angle.cos();
        let inner = (self.angle * (1.0 - self.penumbra.clamp(0.0, 1.0))).cos();
        (outer, inner)
    }
}
