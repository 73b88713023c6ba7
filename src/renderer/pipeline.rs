use super::program::ProgramId;
use crate::model::ModelVertex;
use crate::scene::FillMode;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Raster state a frame can toggle. Each distinct key gets its own pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub program: ProgramId,
    pub fill: FillMode,
    pub depth_test: bool,
    pub cull: bool,
}

impl PipelineKey {
    pub fn topology(&self) -> wgpu::PrimitiveTopology {
        match self.fill {
            FillMode::Solid => wgpu::PrimitiveTopology::TriangleList,
            FillMode::Wireframe => wgpu::PrimitiveTopology::LineList,
        }
    }

    /// Culling only means something for filled triangles.
    pub fn cull_mode(&self) -> Option<wgpu::Face> {
        match (self.cull, self.fill) {
            (true, FillMode::Solid) => Some(wgpu::Face::Back),
            _ => None,
        }
    }

    pub fn depth_stencil(&self) -> wgpu::DepthStencilState {
        let (depth_write_enabled, depth_compare) = if self.depth_test {
            (true, wgpu::CompareFunction::Less)
        } else {
            (false, wgpu::CompareFunction::Always)
        };
        wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

pub fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    key: PipelineKey,
) -> wgpu::RenderPipeline {
    log::debug!("Creating pipeline {:?}", key);
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", key.program.label())),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[ModelVertex::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: key.topology(),
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: key.cull_mode(),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(key.depth_stencil()),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(fill: FillMode, depth_test: bool, cull: bool) -> PipelineKey {
        PipelineKey {
            program: ProgramId::Phong,
            fill,
            depth_test,
            cull,
        }
    }

    #[test]
    fn test_wireframe_uses_lines_without_culling() {
        let wire = key(FillMode::Wireframe, true, true);
        assert_eq!(wire.topology(), wgpu::PrimitiveTopology::LineList);
        assert_eq!(wire.cull_mode(), None);

        let solid = key(FillMode::Solid, true, true);
        assert_eq!(solid.topology(), wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(solid.cull_mode(), Some(wgpu::Face::Back));
        assert_eq!(key(FillMode::Solid, true, false).cull_mode(), None);
    }

    #[test]
    fn test_disabled_depth_test_always_passes() {
        let off = key(FillMode::Solid, false, true).depth_stencil();
        assert_eq!(off.depth_compare, wgpu::CompareFunction::Always);
        assert!(!off.depth_write_enabled);

        let on = key(FillMode::Solid, true, true).depth_stencil();
        assert_eq!(on.depth_compare, wgpu::CompareFunction::Less);
        assert!(on.depth_write_enabled);
    }
}
