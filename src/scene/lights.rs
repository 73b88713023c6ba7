use glam::Vec3;

use crate::model::Rgb8;

/// Number of light slots the object shader declares.
pub const MAX_LIGHTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Emits from `position`.
    Point,
    /// `position` is read as the direction from the scene toward the light.
    Directional,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub ambient: Rgb8,
    pub diffuse: Rgb8,
    pub specular: Rgb8,
    pub kind: LightKind,
    pub active: bool,
}

impl Light {
    pub fn point(position: Vec3) -> Self {
        Self {
            position,
            ambient: Rgb8::gray(50),
            diffuse: Rgb8::WHITE,
            specular: Rgb8::WHITE,
            kind: LightKind::Point,
            active: true,
        }
    }

    pub fn directional(direction: Vec3) -> Self {
        Self {
            kind: LightKind::Directional,
            ..Self::point(direction)
        }
    }

    pub fn with_colors(mut self, ambient: Rgb8, diffuse: Rgb8, specular: Rgb8) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }

    pub fn is_directional(&self) -> bool {
        self.kind == LightKind::Directional
    }

    pub fn to_slot(&self) -> LightSlot {
        let w = match self.kind {
            LightKind::Point => 1.0,
            LightKind::Directional => 0.0,
        };
        LightSlot {
            position: self.position.extend(w).to_array(),
            ambient: self.ambient.normalized(),
            diffuse: self.diffuse.normalized(),
            specular: self.specular.normalized(),
            is_directional: self.is_directional() as u32,
            is_active: self.active as u32,
            _padding: [0; 2],
        }
    }
}

/// One entry of the shader's light array. Matches `LightSlot` in phong.wgsl.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightSlot {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub is_directional: u32,
    pub is_active: u32,
    _padding: [u32; 2],
}

impl LightSlot {
    pub const INACTIVE: LightSlot = LightSlot {
        position: [0.0; 4],
        ambient: [0.0; 4],
        diffuse: [0.0; 4],
        specular: [0.0; 4],
        is_directional: 0,
        is_active: 0,
        _padding: [0; 2],
    };

    pub fn active(&self) -> bool {
        self.is_active != 0
    }
}

/// Everything the object program needs to know about the lights for a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LightUniforms {
    pub count: u32,
    pub slots: [LightSlot; MAX_LIGHTS],
}

/// Ordered, capacity-bounded light collection. Indices are stable for the
/// whole session: lights are never removed or reordered, only deactivated.
#[derive(Debug, Clone, Default)]
pub struct LightSet {
    lights: Vec<Light>,
}

impl LightSet {
    pub fn new() -> Self {
        Self {
            lights: Vec::with_capacity(MAX_LIGHTS),
        }
    }

    /// Appends `light` unless the set is full. Returns whether it was added.
    pub fn add(&mut self, light: Light) -> bool {
        if self.is_full() {
            log::debug!("Light set full ({} lights), ignoring new light", MAX_LIGHTS);
            return false;
        }
        self.lights.push(light);
        true
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lights.len() >= MAX_LIGHTS
    }

    pub fn get(&self, index: usize) -> Option<&Light> {
        self.lights.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.lights.get_mut(index)
    }

    pub fn active(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter().filter(|light| light.active)
    }

    pub fn serialize(&self) -> LightUniforms {
        let mut slots = [LightSlot::INACTIVE; MAX_LIGHTS];
        for (slot, light) in slots.iter_mut().zip(&self.lights) {
            *slot = light.to_slot();
        }
        LightUniforms {
            count: self.lights.len() as u32,
            slots,
        }
    }
}
