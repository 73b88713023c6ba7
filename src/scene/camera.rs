use glam::{Mat4, Vec3};

pub const MIN_FOVY: f32 = 1.0;
pub const MAX_FOVY: f32 = 100.0;
pub const MIN_NEAR: f32 = 0.1;
pub const MAX_NEAR: f32 = 20.0;
pub const MIN_FAR: f32 = 20.0;
pub const MAX_FAR: f32 = 100.0;

/// Degrees of field of view per unit of wheel delta.
pub const ZOOM_SPEED: f32 = 0.01;

/// Smallest gap kept between the near and far planes.
const MIN_DEPTH_RANGE: f32 = 0.01;

/// Look-at camera with a perspective projection. The view and projection
/// matrices are never stored; they are derived from the fields on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub at: Vec3,
    pub up: Vec3,
    fovy: f32, // degrees
    aspect: f32,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, -5.0),
            at: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 45.0,
            aspect: 1.0,
            near: 0.1,
            far: 20.0,
        }
    }
}

impl Camera {
    /// A zero-sized viewport keeps the default square aspect.
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self::default();
        if width > 0 && height > 0 {
            camera.on_resize(width, height);
        }
        camera
    }

    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Sets the field of view, clamped to `[MIN_FOVY, MAX_FOVY]`.
    /// Returns the value actually stored.
    pub fn set_fovy(&mut self, degrees: f32) -> f32 {
        if !degrees.is_finite() {
            return self.fovy;
        }
        self.fovy = degrees.clamp(MIN_FOVY, MAX_FOVY);
        self.fovy
    }

    /// Wheel zoom. A step that would leave the valid range is dropped and
    /// `false` is returned.
    pub fn zoom(&mut self, delta: f32) -> bool {
        let fovy = self.fovy + delta * ZOOM_SPEED;
        if (MIN_FOVY..=MAX_FOVY).contains(&fovy) {
            self.fovy = fovy;
            true
        } else {
            false
        }
    }

    /// Sets the near plane, clamped to `[MIN_NEAR, MAX_NEAR]` and below `far`.
    pub fn set_near(&mut self, near: f32) -> f32 {
        if !near.is_finite() {
            return self.near;
        }
        let upper = MAX_NEAR.min(self.far - MIN_DEPTH_RANGE);
        self.near = near.clamp(MIN_NEAR, upper);
        self.near
    }

    /// Sets the far plane, clamped to `[MIN_FAR, MAX_FAR]` and above `near`.
    pub fn set_far(&mut self, far: f32) -> f32 {
        if !far.is_finite() {
            return self.far;
        }
        let lower = MIN_FAR.max(self.near + MIN_DEPTH_RANGE);
        self.far = far.clamp(lower, MAX_FAR);
        self.far
    }

    /// Updates the aspect ratio from the viewport size. The caller guarantees
    /// a non-zero height; a zero-height viewport leaves the camera untouched.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        debug_assert!(height > 0, "viewport height must be non-zero");
        if height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.at, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy.to_radians(), self.aspect, self.near, self.far)
    }
}
