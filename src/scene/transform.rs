use glam::{Mat4, Vec3};

use super::stack::TransformStack;

/// Local placement of a scene entry, applied on top of the stack's current
/// matrix as translate, then rotate (X, Y, Z, in degrees), then scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotated(mut self, degrees: Vec3) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn scaled(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn apply(&self, stack: &mut TransformStack) {
        stack.translate(self.position);
        stack.rotate_x(self.rotation.x);
        stack.rotate_y(self.rotation.y);
        stack.rotate_z(self.rotation.z);
        stack.scale(self.scale);
    }

    pub fn to_matrix(&self) -> Mat4 {
        let mut stack = TransformStack::new();
        self.apply(&mut stack);
        stack.current()
    }
}
