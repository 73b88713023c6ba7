pub mod frame;
pub mod pipeline;
pub mod program;

pub use frame::{build_frame, plan_or_abort, DrawCall, FramePlan, MARKER_SCALE};
pub use pipeline::PipelineKey;
pub use program::{ProgramId, ProgramInfo, ProgramSet, UniformTable};

use std::collections::HashMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};

use crate::model::PrimitiveLibrary;
use crate::scene::{Scene, TransformStack};

fn create_depth_texture(device: &Device, config: &SurfaceConfiguration) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: pipeline::DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// Owns the GPU side of the viewer and draws one [`FramePlan`] per frame.
pub struct Renderer {
    pub device: Arc<Device>,
    pub queue: Arc<Queue>,
    pub config: SurfaceConfiguration,
    surface: Surface<'static>,
    uniform_bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    shaders: HashMap<ProgramId, wgpu::ShaderModule>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    primitives: PrimitiveLibrary,
    stack: TransformStack,
    programs: ProgramSet,
}

impl Renderer {
    pub fn new(device: Arc<Device>, queue: Arc<Queue>, config: &SurfaceConfiguration, surface: Surface<'static>) -> Self {
        let uniform_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let shaders = ProgramId::ALL
            .into_iter()
            .map(|id| {
                let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(id.label()),
                    source: wgpu::ShaderSource::Wgsl(id.source().into()),
                });
                (id, module)
            })
            .collect();

        let (depth_texture, depth_view) = create_depth_texture(&device, config);
        let primitives = PrimitiveLibrary::new(&device);

        Self {
            device,
            queue,
            config: config.clone(),
            surface,
            uniform_bind_group_layout,
            pipeline_layout,
            shaders,
            pipelines: HashMap::new(),
            depth_texture,
            depth_view,
            primitives,
            stack: TransformStack::new(),
            programs: ProgramSet::new(),
        }
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        winit::dpi::PhysicalSize::new(self.config.width, self.config.height)
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);

            let (texture, view) = create_depth_texture(&self.device, &self.config);
            self.depth_texture = texture;
            self.depth_view = view;
            log::debug!(
                "Resized surface to {}x{} ({:?})",
                new_size.width,
                new_size.height,
                self.depth_texture.size()
            );
        }
    }

    fn ensure_pipeline(&mut self, key: PipelineKey) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        let shader = &self.shaders[&key.program];
        let pipeline = pipeline::create_pipeline(&self.device, &self.pipeline_layout, shader, self.config.format, key);
        self.pipelines.insert(key, pipeline);
    }

    fn key_for(plan: &FramePlan, draw: &DrawCall) -> PipelineKey {
        PipelineKey {
            program: draw.program,
            fill: draw.fill,
            depth_test: plan.depth_test,
            cull: plan.backface_culling,
        }
    }

    /// Draws the scene. A frame whose plan cannot be built is logged and
    /// skipped; surface errors are returned for the event loop to handle.
    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let Some(plan) = plan_or_abort(build_frame(scene, &mut self.stack, &mut self.programs)) else {
            return Ok(());
        };

        for draw in &plan.draws {
            self.ensure_pipeline(Self::key_for(&plan, draw));
        }

        let bind_groups: Vec<wgpu::BindGroup> = plan
            .draws
            .iter()
            .map(|draw| {
                let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Uniform Buffer"),
                    contents: &draw.uniforms,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Uniform Bind Group"),
                    layout: &self.uniform_bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                })
            })
            .collect();

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for (draw, bind_group) in plan.draws.iter().zip(&bind_groups) {
                let pipeline = &self.pipelines[&Self::key_for(&plan, draw)];
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, bind_group, &[]);
                self.primitives.draw(&mut render_pass, draw.primitive, draw.fill);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();

        Ok(())
    }
}
