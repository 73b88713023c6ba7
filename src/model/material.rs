/// An RGB color authored in byte range, `[0, 255]` per channel.
///
/// Every color that reaches a shader goes through [`Rgb8::normalized`], the
/// single `/ 255` mapping to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb8(pub [u8; 3]);

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8([0, 0, 0]);
    pub const WHITE: Rgb8 = Rgb8([255, 255, 255]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub const fn gray(value: u8) -> Self {
        Self([value, value, value])
    }

    /// Channels mapped to `[0, 1]`, alpha fixed at 1.
    pub fn normalized(&self) -> [f32; 4] {
        let [r, g, b] = self.0;
        [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            1.0,
        ]
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub ka: [f32; 4],
    pub kd: [f32; 4],
    pub ks: [f32; 4],
    pub shininess: f32,
    _padding: [f32; 3],
}

/// Phong material applied to whole primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Rgb8,
    pub diffuse: Rgb8,
    pub specular: Rgb8,
    shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Rgb8::new(80, 50, 30),
            diffuse: Rgb8::new(220, 140, 70),
            specular: Rgb8::WHITE,
            shininess: 50.0,
        }
    }
}

impl Material {
    pub fn new(ambient: Rgb8, diffuse: Rgb8, specular: Rgb8, shininess: f32) -> Self {
        let mut material = Self {
            ambient,
            diffuse,
            specular,
            shininess: 0.0,
        };
        material.set_shininess(shininess);
        material
    }

    /// Flat gray with a dull highlight, used for the ground plate.
    pub fn matte(gray: u8) -> Self {
        Self::new(Rgb8::gray(gray / 3), Rgb8::gray(gray), Rgb8::gray(40), 4.0)
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    /// Negative exponents are clamped to 0.
    pub fn set_shininess(&mut self, shininess: f32) {
        self.shininess = shininess.max(0.0);
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        MaterialUniform {
            ka: self.ambient.normalized(),
            kd: self.diffuse.normalized(),
            ks: self.specular.normalized(),
            shininess: self.shininess,
            _padding: [0.0; 3],
        }
    }
}
