use std::collections::HashSet;
use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use glam::Vec3;

use super::ModelVertex;
use crate::error::ViewerError;

const SPHERE_SEGMENTS: u32 = 32;
const SPHERE_RINGS: u32 = 16;
const CYLINDER_SEGMENTS: u32 = 32;
const TORUS_SEGMENTS: u32 = 32;
const TORUS_SIDES: u32 = 16;
const TORUS_MAJOR_RADIUS: f32 = 0.35;
const TORUS_MINOR_RADIUS: f32 = 0.15;

/// The fixed set of shapes the viewer can display. Every shape fits in the
/// unit cube centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Sphere,
    Cube,
    Cylinder,
    Pyramid,
    Torus,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 5] = [
        PrimitiveKind::Sphere,
        PrimitiveKind::Cube,
        PrimitiveKind::Cylinder,
        PrimitiveKind::Pyramid,
        PrimitiveKind::Torus,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Sphere => "sphere",
            PrimitiveKind::Cube => "cube",
            PrimitiveKind::Cylinder => "cylinder",
            PrimitiveKind::Pyramid => "pyramid",
            PrimitiveKind::Torus => "torus",
        }
    }

    pub fn geometry(self) -> Geometry {
        match self {
            PrimitiveKind::Sphere => Geometry::sphere(SPHERE_SEGMENTS, SPHERE_RINGS),
            PrimitiveKind::Cube => Geometry::cube(),
            PrimitiveKind::Cylinder => Geometry::cylinder(CYLINDER_SEGMENTS),
            PrimitiveKind::Pyramid => Geometry::pyramid(),
            PrimitiveKind::Torus => Geometry::torus(TORUS_SEGMENTS, TORUS_SIDES),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrimitiveKind {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| ViewerError::UnknownPrimitive(s.to_string()))
    }
}

/// CPU-side mesh data: a triangle list for solid drawing and a list of unique
/// edges (index pairs) for wireframe drawing. Triangles wind counter-clockwise
/// seen from outside.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub vertices: Vec<ModelVertex>,
    pub triangles: Vec<u32>,
    pub edges: Vec<u32>,
}

impl Geometry {
    /// UV sphere of radius 0.5.
    pub fn sphere(segments: u32, rings: u32) -> Self {
        let mut builder = GeometryBuilder::default();

        for ring in 0..=rings {
            let phi = PI * ring as f32 / rings as f32;
            let (ring_radius, y) = phi.sin_cos();
            for seg in 0..=segments {
                let theta = TAU * seg as f32 / segments as f32;
                let normal = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
                builder.vertex(normal * 0.5, normal);
            }
        }

        for ring in 0..rings {
            for seg in 0..segments {
                let current = ring * (segments + 1) + seg;
                let next = current + segments + 1;
                // the pole rows collapse one triangle of each quad
                if ring != 0 {
                    builder.triangle(current, current + 1, next);
                }
                if ring != rings - 1 {
                    builder.triangle(current + 1, next + 1, next);
                }
            }
        }

        builder.build()
    }

    /// Axis-aligned cube with side 1, flat normals per face.
    pub fn cube() -> Self {
        let mut builder = GeometryBuilder::default();
        // (normal, u, v) with u x v == normal
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        for (normal, u, v) in faces {
            builder.quad(normal * 0.5, u * 0.5, v * 0.5, normal);
        }
        builder.build()
    }

    /// Capped cylinder of radius 0.5 and height 1 along Y.
    pub fn cylinder(segments: u32) -> Self {
        let mut builder = GeometryBuilder::default();

        let side_start = builder.next_index();
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let radial = Vec3::new(theta.cos(), 0.0, theta.sin());
            builder.vertex(radial * 0.5 - Vec3::Y * 0.5, radial);
            builder.vertex(radial * 0.5 + Vec3::Y * 0.5, radial);
        }
        for seg in 0..segments {
            let bottom = side_start + seg * 2;
            let top = bottom + 1;
            let next_bottom = bottom + 2;
            let next_top = bottom + 3;
            builder.triangle(bottom, top, next_top);
            builder.triangle(next_top, next_bottom, bottom);
        }

        for (normal, flip) in [(Vec3::Y, false), (Vec3::NEG_Y, true)] {
            let center = builder.vertex(normal * 0.5, normal);
            let rim_start = builder.next_index();
            for seg in 0..segments {
                let theta = TAU * seg as f32 / segments as f32;
                let rim = Vec3::new(theta.cos() * 0.5, 0.0, theta.sin() * 0.5) + normal * 0.5;
                builder.vertex(rim, normal);
            }
            for seg in 0..segments {
                let a = rim_start + seg;
                let b = rim_start + (seg + 1) % segments;
                if flip {
                    builder.triangle(center, a, b);
                } else {
                    builder.triangle(center, b, a);
                }
            }
        }

        builder.build()
    }

    /// Square pyramid: base side 1 at y = -0.5, apex at y = 0.5.
    pub fn pyramid() -> Self {
        let mut builder = GeometryBuilder::default();
        builder.quad(Vec3::NEG_Y * 0.5, Vec3::X * 0.5, Vec3::Z * 0.5, Vec3::NEG_Y);

        let apex = Vec3::new(0.0, 0.5, 0.0);
        let corners = [
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(-0.5, -0.5, -0.5),
        ];
        for i in 0..corners.len() {
            let a = corners[i];
            let b = corners[(i + 1) % corners.len()];
            let normal = (b - a).cross(apex - a).normalize();
            let ia = builder.vertex(a, normal);
            let ib = builder.vertex(b, normal);
            let ic = builder.vertex(apex, normal);
            builder.triangle(ia, ib, ic);
        }

        builder.build()
    }

    /// Ring torus lying in the XZ plane.
    pub fn torus(segments: u32, sides: u32) -> Self {
        let mut builder = GeometryBuilder::default();

        for i in 0..=segments {
            let theta = TAU * i as f32 / segments as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            for j in 0..=sides {
                let phi = TAU * j as f32 / sides as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();
                let normal = Vec3::new(cos_phi * cos_theta, sin_phi, cos_phi * sin_theta);
                let ring = TORUS_MAJOR_RADIUS + TORUS_MINOR_RADIUS * cos_phi;
                let position = Vec3::new(ring * cos_theta, TORUS_MINOR_RADIUS * sin_phi, ring * sin_theta);
                builder.vertex(position, normal);
            }
        }

        for i in 0..segments {
            for j in 0..sides {
                let a = i * (sides + 1) + j;
                let b = a + 1;
                let c = a + sides + 2;
                let d = a + sides + 1;
                builder.triangle(a, b, c);
                builder.triangle(c, d, a);
            }
        }

        builder.build()
    }
}

#[derive(Default)]
struct GeometryBuilder {
    vertices: Vec<ModelVertex>,
    triangles: Vec<u32>,
}

impl GeometryBuilder {
    fn next_index(&self) -> u32 {
        self.vertices.len() as u32
    }

    fn vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.next_index();
        self.vertices
            .push(ModelVertex::new(position.to_array(), normal.to_array()));
        index
    }

    fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.triangles.extend_from_slice(&[a, b, c]);
    }

    /// Quad spanning `center ± u ± v`, wound so that `u x v` faces out.
    fn quad(&mut self, center: Vec3, u: Vec3, v: Vec3, normal: Vec3) {
        let first = self.vertex(center - u - v, normal);
        self.vertex(center + u - v, normal);
        self.vertex(center + u + v, normal);
        self.vertex(center - u + v, normal);
        self.triangle(first, first + 1, first + 2);
        self.triangle(first + 2, first + 3, first);
    }

    fn build(self) -> Geometry {
        let edges = edge_list(&self.triangles);
        Geometry {
            vertices: self.vertices,
            triangles: self.triangles,
            edges,
        }
    }
}

/// Unique undirected edges of a triangle list, as a line-list index buffer.
fn edge_list(triangles: &[u32]) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for tri in triangles.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            if seen.insert((a.min(b), a.max(b))) {
                edges.extend_from_slice(&[a, b]);
            }
        }
    }
    edges
}
