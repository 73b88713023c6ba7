use winit::event::MouseScrollDelta;
use winit::keyboard::{Key, NamedKey};

use crate::scene::{LightKind, Scene};

/// Wheel pixels per line for mice that report whole lines.
const PIXELS_PER_LINE: f32 = 100.0;

/// A scene edit requested by the keyboard or mouse wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    NextPrimitive,
    ToggleDepthTest,
    ToggleCulling,
    ToggleWireframe,
    ToggleNormals,
    ToggleAnimation,
    AddLight(LightKind),
    /// Wheel delta in pixels; positive widens the field of view.
    Zoom(f32),
}

impl InputAction {
    pub fn from_key(key: &Key, ctrl: bool) -> Option<Self> {
        match key {
            Key::Named(NamedKey::Space) if ctrl => Some(Self::AddLight(LightKind::Directional)),
            Key::Named(NamedKey::Space) => Some(Self::AddLight(LightKind::Point)),
            Key::Character(c) => match c.as_str() {
                "+" => Some(Self::NextPrimitive),
                "b" | "B" => Some(Self::ToggleDepthTest),
                "c" | "C" => Some(Self::ToggleCulling),
                "w" | "W" => Some(Self::ToggleWireframe),
                "n" | "N" => Some(Self::ToggleNormals),
                "p" | "P" => Some(Self::ToggleAnimation),
                _ => None,
            },
            _ => None,
        }
    }

    /// Scrolling down (towards the user) zooms out.
    pub fn from_wheel(delta: &MouseScrollDelta) -> Self {
        let pixels = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * PIXELS_PER_LINE,
            MouseScrollDelta::PixelDelta(position) => -position.y as f32,
        };
        Self::Zoom(pixels)
    }

    pub fn apply(self, scene: &mut Scene) {
        match self {
            Self::NextPrimitive => {
                let kind = scene.next_primitive();
                log::info!("Showing {}", kind);
            }
            Self::ToggleDepthTest => {
                let enabled = scene.toggle_depth_test();
                log::info!("Depth test {}", if enabled { "on" } else { "off" });
            }
            Self::ToggleCulling => {
                let enabled = scene.toggle_backface_culling();
                log::info!("Backface culling {}", if enabled { "on" } else { "off" });
            }
            Self::ToggleWireframe => {
                scene.toggle_wireframe();
            }
            Self::ToggleNormals => {
                scene.toggle_normals();
            }
            Self::ToggleAnimation => {
                let running = !scene.is_animating();
                scene.set_animation(running);
            }
            Self::AddLight(kind) => {
                scene.add_default_light(kind);
            }
            Self::Zoom(pixels) => {
                scene.zoom(pixels);
            }
        }
    }
}
