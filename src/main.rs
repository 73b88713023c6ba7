use anyhow::Result;
use clap::Parser;
use phong_viewer::{InputAction, PrimitiveKind, State, ViewerConfig};
use winit::{
    dpi::PhysicalSize,
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, ModifiersState, NamedKey},
    window::WindowBuilder,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Initial window width
    #[arg(long, default_value_t = 1280, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 720, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Primitive shown at startup (sphere, cube, cylinder, pyramid, torus)
    #[arg(long, default_value_t = PrimitiveKind::Sphere)]
    primitive: PrimitiveKind,

    /// Start in wireframe mode
    #[arg(long)]
    wireframe: bool,

    #[arg(long)]
    no_depth_test: bool,

    #[arg(long)]
    no_cull: bool,

    /// Shade by surface normal instead of Phong lighting
    #[arg(long)]
    normals: bool,

    /// Start without the default white light
    #[arg(long)]
    no_light: bool,

    /// Start with animation paused
    #[arg(long)]
    paused: bool,
}

impl From<Args> for ViewerConfig {
    fn from(args: Args) -> Self {
        Self {
            width: args.width,
            height: args.height,
            primitive: args.primitive,
            wireframe: args.wireframe,
            depth_test: !args.no_depth_test,
            backface_culling: !args.no_cull,
            show_normals: args.normals,
            seed_light: !args.no_light,
            animation: !args.paused,
            ..Self::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let config = ViewerConfig::from(Args::parse());

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(config.width, config.height))
        .build(&event_loop)?;

    let mut state = State::new(window, &config)?;
    let mut modifiers = ModifiersState::empty();

    event_loop.run(move |event, window_target| match event {
        Event::WindowEvent { window_id, event } if window_id == state.window().id() => match event {
            WindowEvent::ModifiersChanged(new_modifiers) => {
                modifiers = new_modifiers.state();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if logical_key == Key::Named(NamedKey::Escape) {
                    window_target.exit();
                } else if let Some(action) = InputAction::from_key(&logical_key, modifiers.control_key()) {
                    state.handle_action(action);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                state.handle_action(InputAction::from_wheel(&delta));
            }
            WindowEvent::CloseRequested => {
                window_target.exit();
            }
            WindowEvent::Resized(new_size) => {
                state.resize(new_size);
            }
            WindowEvent::RedrawRequested => {
                state.update();
                match state.render() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state.resize(state.size());
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory, exiting");
                        window_target.exit();
                    }
                    Err(e) => {
                        log::error!("Surface error: {:?}", e);
                    }
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            state.window().request_redraw();
        }
        _ => {}
    })?;

    Ok(())
}
