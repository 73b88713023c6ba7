pub mod camera;
pub mod events;
pub mod lights;
pub mod options;
pub mod stack;
pub mod transform;
#[cfg(test)]
mod tests;

pub use camera::Camera;
pub use events::{Observers, SceneEvent};
pub use lights::{Light, LightKind, LightSet, LightSlot, LightUniforms, MAX_LIGHTS};
pub use options::{FillMode, RenderOptions};
pub use stack::TransformStack;
pub use transform::Transform;

use glam::Vec3;

use crate::config::ViewerConfig;
use crate::model::{Material, PrimitiveKind};

/// Simulation time added per frame while animation runs.
pub const TIME_STEP: f32 = 1.0 / 60.0;

/// Which mesh a scene entry draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPrimitive {
    /// Whatever [`RenderOptions`] currently selects.
    Selected,
    Fixed(PrimitiveKind),
}

/// One object of the scene list: drawn with `transform` applied on top of
/// the camera view, and with `material` or, when `None`, the scene material.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEntry {
    pub primitive: EntryPrimitive,
    pub transform: Transform,
    pub material: Option<Material>,
}

impl SceneEntry {
    pub fn primitive_kind(&self, options: &RenderOptions) -> PrimitiveKind {
        match self.primitive {
            EntryPrimitive::Selected => options.primitive(),
            EntryPrimitive::Fixed(kind) => kind,
        }
    }

    pub fn material<'a>(&'a self, scene_material: &'a Material) -> &'a Material {
        self.material.as_ref().unwrap_or(scene_material)
    }
}

/// The selected primitive at the origin, then a thin gray plate under it.
pub fn default_entries() -> Vec<SceneEntry> {
    vec![
        SceneEntry {
            primitive: EntryPrimitive::Selected,
            transform: Transform::new(),
            material: None,
        },
        SceneEntry {
            primitive: EntryPrimitive::Fixed(PrimitiveKind::Cube),
            transform: Transform::new()
                .at(Vec3::new(0.0, -0.55, 0.0))
                .scaled(Vec3::new(3.0, 0.1, 3.0)),
            material: Some(Material::matte(150)),
        },
    ]
}

/// All state the frame renderer reads and the input layer edits.
///
/// Fields are only reachable through setters so that every edit is announced
/// to the observers registered with [`Scene::subscribe`].
#[derive(Debug)]
pub struct Scene {
    camera: Camera,
    lights: LightSet,
    material: Material,
    options: RenderOptions,
    entries: Vec<SceneEntry>,
    time: f32,
    animation: bool,
    observers: Observers,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            camera: Camera::new(width, height),
            lights: LightSet::new(),
            material: Material::default(),
            options: RenderOptions::default(),
            entries: default_entries(),
            time: 0.0,
            animation: true,
            observers: Observers::default(),
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        let mut scene = Self::new(config.width, config.height);
        scene.options.wireframe = config.wireframe;
        scene.options.depth_test = config.depth_test;
        scene.options.backface_culling = config.backface_culling;
        scene.options.show_normals = config.show_normals;
        scene.options.select(config.primitive);
        scene.animation = config.animation;
        if config.seed_light {
            scene.lights.add(Light::point(Vec3::new(2.0, 3.0, -3.0)));
        }
        scene
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&SceneEvent) + 'static) {
        self.observers.subscribe(callback);
    }

    /// Advances simulation time by one fixed step when animation runs.
    pub fn tick(&mut self) {
        if self.animation {
            self.time += TIME_STEP;
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_animating(&self) -> bool {
        self.animation
    }

    pub fn set_animation(&mut self, running: bool) {
        self.animation = running;
    }

    // Camera

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.on_resize(width, height);
            self.observers.emit(SceneEvent::ProjectionChanged);
        }
    }

    /// Wheel zoom; returns `false` when the step was out of range and dropped.
    pub fn zoom(&mut self, delta: f32) -> bool {
        let applied = self.camera.zoom(delta);
        if applied {
            log::debug!("Zoom: fovy = {:.2}", self.camera.fovy());
            self.observers.emit(SceneEvent::ProjectionChanged);
        }
        applied
    }

    pub fn set_fovy(&mut self, degrees: f32) -> f32 {
        let fovy = self.camera.set_fovy(degrees);
        self.observers.emit(SceneEvent::ProjectionChanged);
        fovy
    }

    pub fn set_near(&mut self, near: f32) -> f32 {
        let near = self.camera.set_near(near);
        self.observers.emit(SceneEvent::ProjectionChanged);
        near
    }

    pub fn set_far(&mut self, far: f32) -> f32 {
        let far = self.camera.set_far(far);
        self.observers.emit(SceneEvent::ProjectionChanged);
        far
    }

    pub fn set_eye(&mut self, eye: Vec3) {
        self.camera.eye = eye;
        self.observers.emit(SceneEvent::CameraChanged);
    }

    pub fn set_at(&mut self, at: Vec3) {
        self.camera.at = at;
        self.observers.emit(SceneEvent::CameraChanged);
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.camera.up = up;
        self.observers.emit(SceneEvent::CameraChanged);
    }

    // Lights

    pub fn lights(&self) -> &LightSet {
        &self.lights
    }

    /// Returns `false` when the light set is already full.
    pub fn add_light(&mut self, light: Light) -> bool {
        if !self.lights.add(light) {
            log::warn!("Cannot add light: all {} slots are in use", MAX_LIGHTS);
            return false;
        }
        let index = self.lights.len() - 1;
        log::info!("Added {:?} light #{} at {}", light.kind, index, light.position);
        self.observers.emit(SceneEvent::LightAdded(index));
        true
    }

    /// Adds a white light placed around the object, each new light a further
    /// 45 degrees along the circle.
    pub fn add_default_light(&mut self, kind: LightKind) -> bool {
        let angle = (self.lights.len() as f32 * 45.0).to_radians();
        let (sin, cos) = angle.sin_cos();
        let light = match kind {
            LightKind::Point => Light::point(Vec3::new(3.0 * cos, 2.0, 3.0 * sin)),
            LightKind::Directional => Light::directional(Vec3::new(cos, 1.0, sin)),
        };
        self.add_light(light)
    }

    /// Edits light `index` in place. Returns `false` if there is no such light.
    pub fn update_light(&mut self, index: usize, edit: impl FnOnce(&mut Light)) -> bool {
        match self.lights.get_mut(index) {
            Some(light) => {
                edit(light);
                self.observers.emit(SceneEvent::LightChanged(index));
                true
            }
            None => false,
        }
    }

    pub fn set_light_active(&mut self, index: usize, active: bool) -> bool {
        self.update_light(index, |light| light.active = active)
    }

    // Material

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
        self.observers.emit(SceneEvent::MaterialChanged);
    }

    pub fn update_material(&mut self, edit: impl FnOnce(&mut Material)) {
        edit(&mut self.material);
        self.observers.emit(SceneEvent::MaterialChanged);
    }

    // Options

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn update_options(&mut self, edit: impl FnOnce(&mut RenderOptions)) {
        edit(&mut self.options);
        log::debug!("Render options: {:?}", self.options);
        self.observers.emit(SceneEvent::OptionsChanged);
    }

    pub fn toggle_depth_test(&mut self) -> bool {
        self.update_options(|o| o.depth_test = !o.depth_test);
        self.options.depth_test
    }

    pub fn toggle_backface_culling(&mut self) -> bool {
        self.update_options(|o| o.backface_culling = !o.backface_culling);
        self.options.backface_culling
    }

    pub fn toggle_wireframe(&mut self) -> bool {
        self.update_options(|o| o.wireframe = !o.wireframe);
        self.options.wireframe
    }

    pub fn toggle_normals(&mut self) -> bool {
        self.update_options(|o| o.show_normals = !o.show_normals);
        self.options.show_normals
    }

    pub fn next_primitive(&mut self) -> PrimitiveKind {
        self.update_options(|o| {
            o.next_primitive();
        });
        self.options.primitive()
    }

    // Scene list

    pub fn entries(&self) -> &[SceneEntry] {
        &self.entries
    }

    pub fn push_entry(&mut self, entry: SceneEntry) {
        self.entries.push(entry);
    }
}
