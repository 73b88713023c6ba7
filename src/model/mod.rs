mod material;
mod mesh;
mod primitives;
mod vertex;

pub use material::{Material, MaterialUniform, Rgb8};
pub use mesh::{Mesh, PrimitiveLibrary};
pub use primitives::{Geometry, PrimitiveKind};
pub use vertex::ModelVertex;
