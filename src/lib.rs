use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use winit::window::Window;

pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod renderer;
pub mod scene;

pub use config::ViewerConfig;
pub use error::ViewerError;
pub use input::InputAction;
pub use model::PrimitiveKind;
pub use renderer::Renderer;
pub use scene::Scene;

pub struct State {
    window: Arc<Window>,
    pub scene: Scene,
    renderer: Renderer,
}

impl State {
    pub fn new(window: Window, config: &ViewerConfig) -> Result<Self> {
        let window = Arc::new(window);
        let size = window.inner_size();

        log::info!("Creating WGPU instance...");
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        log::info!("Creating surface ({}x{})", size.width, size.height);
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("Failed to find appropriate adapter"))?;

        let info = adapter.get_info();
        log::info!("Using adapter: {} ({:?})", info.name, info.backend);
        log::debug!("Adapter driver: {} {}", info.driver, info.driver_info);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Primary Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("Failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface reports no supported formats"))?;
        log::info!("Selected surface format: {:?}", surface_format);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let renderer = Renderer::new(Arc::new(device), Arc::new(queue), &surface_config, surface);

        let mut scene = Scene::from_config(config);
        scene.resize(surface_config.width, surface_config.height);

        Ok(Self {
            window,
            scene,
            renderer,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.renderer.size()
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size);
            self.scene.resize(new_size.width, new_size.height);
        }
    }

    pub fn handle_action(&mut self, action: InputAction) {
        action.apply(&mut self.scene);
    }

    pub fn update(&mut self) {
        self.scene.tick();
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.renderer.render(&self.scene)
    }
}
