use crate::model::PrimitiveKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillMode {
    Solid,
    Wireframe,
}

/// Rasterizer and selection state edited between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub wireframe: bool,
    pub depth_test: bool,
    pub backface_culling: bool,
    /// Shade by view-space normal instead of Phong lighting.
    pub show_normals: bool,
    primitive_index: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            wireframe: false,
            depth_test: true,
            backface_culling: true,
            show_normals: false,
            primitive_index: 0,
        }
    }
}

impl RenderOptions {
    pub fn fill_mode(&self) -> FillMode {
        if self.wireframe {
            FillMode::Wireframe
        } else {
            FillMode::Solid
        }
    }

    pub fn primitive_index(&self) -> usize {
        self.primitive_index
    }

    pub fn primitive(&self) -> PrimitiveKind {
        PrimitiveKind::ALL[self.primitive_index]
    }

    /// Selects `index`, wrapping modulo the number of primitives.
    pub fn select_primitive(&mut self, index: usize) {
        self.primitive_index = index % PrimitiveKind::ALL.len();
    }

    pub fn select(&mut self, kind: PrimitiveKind) {
        self.primitive_index = kind.index();
    }

    pub fn next_primitive(&mut self) -> PrimitiveKind {
        self.select_primitive(self.primitive_index + 1);
        self.primitive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_index_wraps() {
        let mut options = RenderOptions::default();
        assert_eq!(options.primitive(), PrimitiveKind::Sphere);

        let seen: Vec<_> = (0..5).map(|_| options.next_primitive()).collect();
        assert_eq!(
            seen,
            vec![
                PrimitiveKind::Cube,
                PrimitiveKind::Cylinder,
                PrimitiveKind::Pyramid,
                PrimitiveKind::Torus,
                PrimitiveKind::Sphere,
            ]
        );

        options.select_primitive(13);
        assert_eq!(options.primitive_index(), 3);
    }

    #[test]
    fn test_fill_mode_follows_wireframe() {
        let mut options = RenderOptions::default();
        assert_eq!(options.fill_mode(), FillMode::Solid);
        options.wireframe = true;
        assert_eq!(options.fill_mode(), FillMode::Wireframe);
    }
}
