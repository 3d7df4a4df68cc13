use std::f32::consts::{PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// GPU ready mesh data produced by tessellating a [`Geometry`].
///
/// Vertices are laid out as `position.xyz` followed by `normal.xyz`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&position.to_array());
        self.vertices.extend_from_slice(&normal.to_array());
        index
    }
}

pub const FLOATS_PER_VERTEX: usize = 6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("{shape} dimension `{name}` must be positive, got {value}")]
    NonPositiveDimension {
        shape: &'static str,
        name: &'static str,
        value: f32,
    },
    #[error("{shape} needs at least {min} {name}, got {value}")]
    TooFewSegments {
        shape: &'static str,
        name: &'static str,
        min: u32,
        value: u32,
    },
}

/// Shape descriptor for a mesh node. Shared between nodes through its id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Rectangle in the XY plane facing +Z.
    Plane { width: f32, height: f32 },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Capped cylinder aligned with the Y axis.
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
}

impl Geometry {
    pub fn plane(width: f32, height: f32) -> Self {
        Self::Plane { width, height }
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self::Sphere {
            radius,
            width_segments,
            height_segments,
        }
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        Self::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        }
    }

    /// Checks that the dimensions describe a drawable shape.
    pub fn validate(&self) -> Result<(), GeometryError> {
        match *self {
            Self::Plane { width, height } => {
                positive("plane", "width", width)?;
                positive("plane", "height", height)
            }
            Self::Sphere {
                radius,
                width_segments,
                height_segments,
            } => {
                positive("sphere", "radius", radius)?;
                at_least("sphere", "width segments", 3, width_segments)?;
                at_least("sphere", "height segments", 2, height_segments)
            }
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => {
                // A cone has one zero radius, but not both.
                if radius_top < 0.0 || radius_bottom < 0.0 || radius_top + radius_bottom <= 0.0 {
                    return Err(GeometryError::NonPositiveDimension {
                        shape: "cylinder",
                        name: "radius",
                        value: radius_top.min(radius_bottom),
                    });
                }
                positive("cylinder", "height", height)?;
                at_least("cylinder", "radial segments", 3, radial_segments)
            }
        }
    }

    /// Builds interleaved vertex and index arrays for this shape.
    pub fn tessellate(&self) -> Result<MeshData, GeometryError> {
        self.validate()?;
        let mesh = match *self {
            Self::Plane { width, height } => plane_mesh(width, height),
            Self::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere_mesh(radius, width_segments, height_segments),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => cylinder_mesh(radius_top, radius_bottom, height, radial_segments),
        };
        Ok(mesh)
    }
}

fn positive(shape: &'static str, name: &'static str, value: f32) -> Result<(), GeometryError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonPositiveDimension { shape, name, value })
    }
}

fn at_least(shape: &'static str, name: &'static str, min: u32, value: u32) -> Result<(), GeometryError> {
    if value >= min {
        Ok(())
    } else {
        Err(GeometryError::TooFewSegments {
            shape,
            name,
            min,
            value,
        })
    }
}

fn plane_mesh(width: f32, height: f32) -> MeshData {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let mut mesh = MeshData::default();
    for position in [
        Vec3::new(-hw, -hh, 0.0),
        Vec3::new(hw, -hh, 0.0),
        Vec3::new(hw, hh, 0.0),
        Vec3::new(-hw, hh, 0.0),
    ] {
        mesh.push_vertex(position, Vec3::Z);
    }
    mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
    mesh
}

fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let row = width_segments + 1;
    for y in 0..=height_segments {
        let v = y as f32 / height_segments as f32;
        let theta = v * PI;
        for x in 0..=width_segments {
            let u = x as f32 / width_segments as f32;
            let phi = u * TAU;
            let normal = Vec3::new(
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            );
            mesh.push_vertex(normal * radius, normal);
        }
    }
    for y in 0..height_segments {
        for x in 0..width_segments {
            let a = y * row + x + 1;
            let b = y * row + x;
            let c = (y + 1) * row + x;
            let d = (y + 1) * row + x + 1;
            if y != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if y != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

fn cylinder_mesh(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;

    let mut side = Vec::with_capacity(2 * (segments as usize + 1));
    for x in 0..=segments {
        let theta = x as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        let normal = Vec3::new(sin, slope, cos).normalize();
        let top = mesh.push_vertex(Vec3::new(radius_top * sin, half, radius_top * cos), normal);
        let bottom = mesh.push_vertex(
            Vec3::new(radius_bottom * sin, -half, radius_bottom * cos),
            normal,
        );
        side.push((top, bottom));
    }
    for pair in side.windows(2) {
        let (t0, b0) = pair[0];
        let (t1, b1) = pair[1];
        mesh.indices.extend_from_slice(&[t0, b0, t1, b0, b1, t1]);
    }

    for (y, radius, normal) in [(half, radius_top, Vec3::Y), (-half, radius_bottom, Vec3::NEG_Y)] {
        if radius <= 0.0 {
            continue;
        }
        let center = mesh.push_vertex(Vec3::new(0.0, y, 0.0), normal);
        let first = mesh.vertex_count() as u32;
        for x in 0..=segments {
            let theta = x as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            mesh.push_vertex(Vec3::new(radius * sin, y, radius * cos), normal);
        }
        for x in 0..segments {
            let (i0, i1) = (first + x, first + x + 1);
            if normal.y > 0.0 {
                mesh.indices.extend_from_slice(&[i0, i1, center]);
            } else {
                mesh.indices.extend_from_slice(&[i1, i0, center]);
            }
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn positions(mesh: &MeshData) -> Vec<Vec3> {
        mesh.vertices
            .chunks(FLOATS_PER_VERTEX)
            .map(|v| Vec3::new(v[0], v[1], v[2]))
            .collect()
    }

    #[test]
    fn plane_spans_requested_extent() {
        let mesh = Geometry::plane(40.0, 50.0).tessellate().unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices.len(), 6);
        let points = positions(&mesh);
        let max_x = points.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        let max_y = points.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        assert_relative_eq!(max_x, 20.0);
        assert_relative_eq!(max_y, 25.0);
        assert!(points.iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = Geometry::sphere(0.05, 32, 16).tessellate().unwrap();
        assert_eq!(mesh.vertex_count(), 33 * 17);
        for point in positions(&mesh) {
            assert_relative_eq!(point.length(), 0.05, epsilon = 1e-6);
        }
        let count = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn cylinder_has_caps_and_height() {
        let mesh = Geometry::cylinder(0.3, 0.3, 3.7, 32).tessellate().unwrap();
        let points = positions(&mesh);
        let max_y = points.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        let min_y = points.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        assert_relative_eq!(max_y - min_y, 3.7, epsilon = 1e-6);
        // side quads plus two fans
        assert_eq!(mesh.indices.len(), 32 * 6 + 2 * 32 * 3);
    }

    #[test]
    fn cone_skips_the_degenerate_cap() {
        let mesh = Geometry::cylinder(0.0, 1.0, 2.0, 8).tessellate().unwrap();
        assert_eq!(mesh.indices.len(), 8 * 6 + 8 * 3);
    }

    #[test]
    fn rejects_invalid_dimensions() {
        assert!(matches!(
            Geometry::plane(0.0, 1.0).validate(),
            Err(GeometryError::NonPositiveDimension { name: "width", .. })
        ));
        assert!(matches!(
            Geometry::sphere(1.0, 2, 16).tessellate(),
            Err(GeometryError::TooFewSegments { min: 3, .. })
        ));
        assert!(Geometry::cylinder(0.0, 0.0, 1.0, 8).validate().is_err());
    }
}
