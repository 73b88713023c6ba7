use crate::model::PrimitiveKind;

/// Startup settings, filled from the command line by the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub primitive: PrimitiveKind,
    pub wireframe: bool,
    pub depth_test: bool,
    pub backface_culling: bool,
    pub show_normals: bool,
    /// Start with one white point light so the object is visible.
    pub seed_light: bool,
    pub animation: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Phong Viewer".to_string(),
            width: 1280,
            height: 720,
            primitive: PrimitiveKind::Sphere,
            wireframe: false,
            depth_test: true,
            backface_culling: true,
            show_normals: false,
            seed_light: true,
            animation: true,
        }
    }
}
