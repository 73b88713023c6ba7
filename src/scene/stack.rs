use glam::{Mat4, Vec3};

use crate::error::{Result, ViewerError};

/// Model-view matrix stack.
///
/// Every composition right-multiplies the current matrix, so the call made
/// last is the one applied to the object first. Sibling draws are isolated by
/// bracketing them with [`push`](Self::push) / [`pop`](Self::pop).
#[derive(Debug, Clone)]
pub struct TransformStack {
    current: Mat4,
    saved: Vec<Mat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            current: Mat4::IDENTITY,
            saved: Vec::with_capacity(8),
        }
    }

    /// Drops every saved matrix and sets the current one to identity.
    pub fn reset(&mut self) {
        self.load(Mat4::IDENTITY);
    }

    /// Drops every saved matrix and starts the frame from `matrix`
    /// (the camera view when walking the scene).
    pub fn load(&mut self, matrix: Mat4) {
        self.saved.clear();
        self.current = matrix;
    }

    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    pub fn pop(&mut self) -> Result<()> {
        match self.saved.pop() {
            Some(matrix) => {
                self.current = matrix;
                Ok(())
            }
            None => Err(ViewerError::StackUnderflow),
        }
    }

    /// Runs `f` between a push and its matching pop.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> Result<R> {
        self.push();
        let result = f(self);
        self.pop()?;
        Ok(result)
    }

    pub fn multiply(&mut self, matrix: Mat4) {
        self.current *= matrix;
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.multiply(Mat4::from_translation(offset));
    }

    pub fn scale(&mut self, factors: Vec3) {
        self.multiply(Mat4::from_scale(factors));
    }

    pub fn rotate_x(&mut self, degrees: f32) {
        self.multiply(Mat4::from_rotation_x(degrees.to_radians()));
    }

    pub fn rotate_y(&mut self, degrees: f32) {
        self.multiply(Mat4::from_rotation_y(degrees.to_radians()));
    }

    pub fn rotate_z(&mut self, degrees: f32) {
        self.multiply(Mat4::from_rotation_z(degrees.to_radians()));
    }

    pub fn current(&self) -> Mat4 {
        self.current
    }

    /// Number of saved matrices, 0 at frame start.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn ensure_balanced(&self) -> Result<()> {
        match self.depth() {
            0 => Ok(()),
            depth => Err(ViewerError::UnbalancedStack { depth }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_mat_eq(a: Mat4, b: Mat4) {
        for (x, y) in a.to_cols_array().iter().zip(b.to_cols_array().iter()) {
            assert_relative_eq!(x, y, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_starts_at_identity() {
        let stack = TransformStack::new();
        assert_eq!(stack.current(), Mat4::IDENTITY);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_push_pop_restores_parent() {
        let mut stack = TransformStack::new();
        stack.translate(Vec3::new(0.0, 1.0, 0.0));
        let before = stack.current();

        stack.push();
        stack.translate(Vec3::new(3.0, -2.0, 5.0));
        stack.rotate_y(37.0);
        stack.scale(Vec3::new(2.0, 0.5, 4.0));
        stack.push();
        stack.rotate_x(-90.0);
        stack.pop().unwrap();
        stack.pop().unwrap();

        assert_mat_eq(stack.current(), before);
        assert!(stack.ensure_balanced().is_ok());
    }

    #[test]
    fn test_pop_on_empty_stack_underflows() {
        let mut stack = TransformStack::new();
        assert_eq!(stack.pop(), Err(ViewerError::StackUnderflow));

        stack.push();
        assert!(stack.pop().is_ok());
        assert_eq!(stack.pop(), Err(ViewerError::StackUnderflow));
    }

    #[test]
    fn test_translate_then_scale_keeps_translation_outermost() {
        let mut stack = TransformStack::new();
        stack.reset();
        stack.translate(Vec3::new(1.0, 0.0, 0.0));
        stack.scale(Vec3::splat(2.0));

        let origin = stack.current().transform_point3(Vec3::ZERO);
        assert_relative_eq!(origin.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(origin.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(origin.z, 0.0, epsilon = 1e-6);

        let unit_x = stack.current().transform_point3(Vec3::X);
        assert_relative_eq!(unit_x.x, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rotations_take_degrees() {
        let mut stack = TransformStack::new();
        stack.rotate_z(90.0);
        let p = stack.current().transform_point3(Vec3::X);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-6);

        stack.reset();
        stack.rotate_x(90.0);
        let p = stack.current().transform_point3(Vec3::Y);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-6);

        stack.reset();
        stack.rotate_y(90.0);
        let p = stack.current().transform_point3(Vec3::Z);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_load_clears_saved_state() {
        let mut stack = TransformStack::new();
        stack.push();
        stack.push();
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        stack.load(view);

        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.current(), view);
    }

    #[test]
    fn test_unbalanced_depth_is_reported() {
        let mut stack = TransformStack::new();
        stack.push();
        stack.push();
        assert_eq!(
            stack.ensure_balanced(),
            Err(ViewerError::UnbalancedStack { depth: 2 })
        );
    }

    #[test]
    fn test_scoped_pairs_push_and_pop() {
        let mut stack = TransformStack::new();
        let inner = stack
            .scoped(|s| {
                s.translate(Vec3::new(4.0, 0.0, 0.0));
                s.current()
            })
            .unwrap();

        assert_eq!(inner.w_axis.x, 4.0);
        assert_eq!(stack.current(), Mat4::IDENTITY);
        assert_eq!(stack.depth(), 0);
    }
}
