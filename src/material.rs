use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Shading model requested for a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shading {
    /// Physically based look; drawn as diffuse plus emissive.
    Standard,
    /// Diffuse only.
    Lambert,
    /// Diffuse with a specular highlight controlled by `shininess`.
    Phong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Front,
    Double,
}

/// Reference to an image applied to a material. The image is never decoded
/// by this crate; the renderer draws the material color instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureMap {
    pub path: String,
    pub repeat: Vec2,
    pub wrap_repeat: bool,
}

impl TextureMap {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            repeat: Vec2::ONE,
            wrap_repeat: false,
        }
    }

    /// Tiles the image `x` by `y` times with repeat wrapping on both axes.
    pub fn tiled(path: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            path: path.into(),
            repeat: Vec2::new(x, y),
            wrap_repeat: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub shading: Shading,
    pub color: Vec3,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub shininess: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub side: Side,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<TextureMap>,
}

impl Material {
    pub fn new(shading: Shading) -> Self {
        Self {
            shading,
            color: Vec3::ONE,
            emissive: Vec3::ZERO,
            emissive_intensity: 1.0,
            shininess: 30.0,
            opacity: 1.0,
            transparent: false,
            side: Side::Front,
            map: None,
        }
    }

    pub fn standard() -> Self {
        Self::new(Shading::Standard)
    }

    pub fn lambert() -> Self {
        Self::new(Shading::Lambert)
    }

    pub fn phong() -> Self {
        Self::new(Shading::Phong)
    }

    pub fn with_color(mut self, hex: u32) -> Self {
        self.color = color_from_hex(hex);
        self
    }

    pub fn with_emissive(mut self, hex: u32, intensity: f32) -> Self {
        self.emissive = color_from_hex(hex);
        self.emissive_intensity = intensity;
        self
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    pub fn with_map(mut self, map: TextureMap) -> Self {
        self.map = Some(map);
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.side = Side::Double;
        self
    }

    /// Opacity used for blending. Opaque materials ignore `opacity`.
    pub fn effective_opacity(&self) -> f32 {
        if self.transparent {
            self.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// True when the material contributes nothing to the frame.
    pub fn is_invisible(&self) -> bool {
        self.effective_opacity() <= 0.0
    }
}

/// Converts a `0xRRGGBB` value into 0..1 channel values.
pub fn color_from_hex(hex: u32) -> Vec3 {
    let r = (hex >> 16) & 0xFF;
    let g = (hex >> 8) & 0xFF;
    let b = hex & 0xFF;
    Vec3::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_are_split_into_channels() {
        assert_eq!(color_from_hex(0xFFFFFF), Vec3::ONE);
        assert_eq!(color_from_hex(0x000000), Vec3::ZERO);
        assert_eq!(
            color_from_hex(0x5A2800),
            Vec3::new(90.0 / 255.0, 40.0 / 255.0, 0.0)
        );
    }

    #[test]
    fn opacity_only_applies_when_transparent() {
        let mut material = Material::standard();
        material.opacity = 0.0;
        assert!(!material.is_invisible());
        material.transparent = true;
        assert!(material.is_invisible());
        material.opacity = 0.4;
        assert_eq!(material.effective_opacity(), 0.4);
    }

    #[test]
    fn tiled_maps_wrap() {
        let material = Material::lambert().with_map(TextureMap::tiled("walls.jpg", 8.0, 1.5));
        let map = material.map.unwrap();
        assert!(map.wrap_repeat);
        assert_eq!(map.repeat, Vec2::new(8.0, 1.5));
    }

    #[test]
    fn untextured_materials_omit_the_map() {
        let ceiling = Material::standard().with_color(0x5A2800).double_sided();
        let json = serde_json::to_string(&ceiling).unwrap();
        assert!(!json.contains("map"));
        assert_eq!(serde_json::from_str::<Material>(&json).unwrap(), ceiling);

        let door = Material::phong()
            .with_map(TextureMap::new("assets/textures/door.png"))
            .with_shininess(200.0);
        let json = serde_json::to_string(&door).unwrap();
        assert_eq!(serde_json::from_str::<Material>(&json).unwrap(), door);
    }
}
