use wgpu::util::DeviceExt;

use super::{Geometry, PrimitiveKind};
use crate::scene::FillMode;

/// Geometry uploaded to the GPU, with one index buffer per fill mode.
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub triangle_buffer: wgpu::Buffer,
    pub edge_buffer: wgpu::Buffer,
    pub num_triangle_indices: u32,
    pub num_edge_indices: u32,
}

impl Mesh {
    pub fn new(device: &wgpu::Device, name: &str, geometry: &Geometry) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let triangle_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Triangle Index Buffer", name)),
            contents: bytemuck::cast_slice(&geometry.triangles),
            usage: wgpu::BufferUsages::INDEX,
        });

        let edge_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Edge Index Buffer", name)),
            contents: bytemuck::cast_slice(&geometry.edges),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            name: name.to_string(),
            vertex_buffer,
            triangle_buffer,
            edge_buffer,
            num_triangle_indices: geometry.triangles.len() as u32,
            num_edge_indices: geometry.edges.len() as u32,
        }
    }

    /// Issues the draw call. The bound pipeline must use a triangle-list
    /// topology for `Solid` and a line-list topology for `Wireframe`.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, fill: FillMode) {
        let (index_buffer, count) = match fill {
            FillMode::Solid => (&self.triangle_buffer, self.num_triangle_indices),
            FillMode::Wireframe => (&self.edge_buffer, self.num_edge_indices),
        };
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..count, 0, 0..1);
    }
}

/// One uploaded mesh per [`PrimitiveKind`], created once at startup.
pub struct PrimitiveLibrary {
    meshes: Vec<Mesh>,
}

impl PrimitiveLibrary {
    pub fn new(device: &wgpu::Device) -> Self {
        let meshes = PrimitiveKind::ALL
            .iter()
            .map(|kind| {
                let geometry = kind.geometry();
                log::debug!(
                    "Uploading {}: {} vertices, {} triangles, {} edges",
                    kind,
                    geometry.vertices.len(),
                    geometry.triangles.len() / 3,
                    geometry.edges.len() / 2
                );
                Mesh::new(device, kind.name(), &geometry)
            })
            .collect();
        Self { meshes }
    }

    pub fn mesh(&self, kind: PrimitiveKind) -> &Mesh {
        &self.meshes[kind.index()]
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, kind: PrimitiveKind, fill: FillMode) {
        self.mesh(kind).draw(render_pass, fill);
    }
}
