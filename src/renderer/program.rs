use std::collections::{HashMap, HashSet};

use bytemuck::Pod;

use crate::scene::MAX_LIGHTS;

/// The shader programs the frame renderer draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramId {
    /// Multi-light Phong shading of scene objects.
    Phong,
    /// Scene objects colored by view-space normal; declares no lighting.
    Normals,
    /// Flat colored light markers.
    Marker,
}

impl ProgramId {
    pub const ALL: [ProgramId; 3] = [ProgramId::Phong, ProgramId::Normals, ProgramId::Marker];

    pub fn label(self) -> &'static str {
        match self {
            ProgramId::Phong => "Phong",
            ProgramId::Normals => "Normals",
            ProgramId::Marker => "Marker",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            ProgramId::Phong => include_str!("shaders/phong.wgsl"),
            ProgramId::Normals => include_str!("shaders/normals.wgsl"),
            ProgramId::Marker => include_str!("shaders/marker.wgsl"),
        }
    }

    /// Members of the program's uniform block, in declaration order. Must
    /// mirror the WGSL struct bound at group 0, binding 0.
    pub fn uniforms(self) -> &'static [UniformDecl] {
        match self {
            ProgramId::Phong => PHONG_UNIFORMS,
            ProgramId::Normals => NORMALS_UNIFORMS,
            ProgramId::Marker => MARKER_UNIFORMS,
        }
    }
}

const PHONG_UNIFORMS: &[UniformDecl] = &[
    UniformDecl::new("mProjection", UniformType::Mat4),
    UniformDecl::new("mModelView", UniformType::Mat4),
    UniformDecl::new("mView", UniformType::Mat4),
    UniformDecl::new("mNormals", UniformType::Mat4),
    UniformDecl::new("mViewNormals", UniformType::Mat4),
    UniformDecl::new("uMaterial", UniformType::Struct { size: 64 }),
    UniformDecl::new("uNumLights", UniformType::U32),
    UniformDecl::new("uLights", UniformType::Array { stride: 80, count: MAX_LIGHTS }),
];

const NORMALS_UNIFORMS: &[UniformDecl] = &[
    UniformDecl::new("mProjection", UniformType::Mat4),
    UniformDecl::new("mModelView", UniformType::Mat4),
    UniformDecl::new("mNormals", UniformType::Mat4),
];

const MARKER_UNIFORMS: &[UniformDecl] = &[
    UniformDecl::new("mProjection", UniformType::Mat4),
    UniformDecl::new("mModelView", UniformType::Mat4),
    UniformDecl::new("uColor", UniformType::Vec4),
];

/// WGSL uniform member types, with their uniform address space layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformType {
    Mat4,
    Vec4,
    U32,
    /// A struct whose members are all 16-byte aligned.
    Struct { size: usize },
    /// Array of 16-byte aligned elements.
    Array { stride: usize, count: usize },
}

impl UniformType {
    pub fn size(self) -> usize {
        match self {
            UniformType::Mat4 => 64,
            UniformType::Vec4 => 16,
            UniformType::U32 => 4,
            UniformType::Struct { size } => size,
            UniformType::Array { stride, count } => stride * count,
        }
    }

    pub fn align(self) -> usize {
        match self {
            UniformType::U32 => 4,
            _ => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformDecl {
    pub name: &'static str,
    pub ty: UniformType,
}

impl UniformDecl {
    pub const fn new(name: &'static str, ty: UniformType) -> Self {
        Self { name, ty }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformSlot {
    pub offset: usize,
    pub size: usize,
}

fn round_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

/// Byte offsets of a program's uniforms, resolved once by name.
#[derive(Debug, Clone)]
pub struct UniformTable {
    slots: HashMap<&'static str, UniformSlot>,
    size: usize,
}

impl UniformTable {
    pub fn new(decls: &[UniformDecl]) -> Self {
        let mut slots = HashMap::with_capacity(decls.len());
        let mut offset = 0;
        for decl in decls {
            offset = round_up(offset, decl.ty.align());
            slots.insert(
                decl.name,
                UniformSlot {
                    offset,
                    size: decl.ty.size(),
                },
            );
            offset += decl.ty.size();
        }
        Self {
            slots,
            size: round_up(offset.max(16), 16),
        }
    }

    pub fn slot(&self, name: &str) -> Option<UniformSlot> {
        self.slots.get(name).copied()
    }

    /// Size of the whole uniform block in bytes.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// CPU copy of one draw call's uniform block.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformBlock {
    bytes: Vec<u8>,
}

impl UniformBlock {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Reads back a value written at `slot`. Used by tests and debugging.
    pub fn read<T: Pod>(&self, slot: UniformSlot) -> T {
        bytemuck::pod_read_unaligned(&self.bytes[slot.offset..slot.offset + std::mem::size_of::<T>()])
    }
}

/// A program's uniform table plus the set of names already reported missing.
#[derive(Debug)]
pub struct ProgramInfo {
    id: ProgramId,
    table: UniformTable,
    reported: HashSet<String>,
}

impl ProgramInfo {
    pub fn new(id: ProgramId) -> Self {
        Self {
            id,
            table: UniformTable::new(id.uniforms()),
            reported: HashSet::new(),
        }
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn table(&self) -> &UniformTable {
        &self.table
    }

    pub fn begin(&self) -> UniformBlock {
        UniformBlock {
            bytes: vec![0; self.table.size()],
        }
    }

    /// Writes `value` into the uniform called `name`. A name the program
    /// does not declare, or a value of the wrong size, is skipped with a
    /// warning the first time it happens. Returns whether the write happened.
    pub fn set<T: Pod>(&mut self, block: &mut UniformBlock, name: &str, value: &T) -> bool {
        let bytes = bytemuck::bytes_of(value);
        match self.table.slot(name) {
            Some(slot) if slot.size == bytes.len() => {
                block.bytes[slot.offset..slot.offset + slot.size].copy_from_slice(bytes);
                true
            }
            Some(slot) => {
                if self.reported.insert(name.to_string()) {
                    log::warn!(
                        "{} program: uniform '{}' is {} bytes but {} were supplied; skipping",
                        self.id.label(),
                        name,
                        slot.size,
                        bytes.len()
                    );
                }
                false
            }
            None => {
                if self.reported.insert(name.to_string()) {
                    log::warn!(
                        "{} program does not declare uniform '{}'; skipping upload",
                        self.id.label(),
                        name
                    );
                }
                false
            }
        }
    }
}

/// CPU-side information for every program, resolved at startup.
#[derive(Debug)]
pub struct ProgramSet {
    programs: HashMap<ProgramId, ProgramInfo>,
}

impl Default for ProgramSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramSet {
    pub fn new() -> Self {
        let programs = ProgramId::ALL
            .into_iter()
            .map(|id| (id, ProgramInfo::new(id)))
            .collect();
        Self { programs }
    }

    pub fn get(&self, id: ProgramId) -> &ProgramInfo {
        &self.programs[&id]
    }

    pub fn get_mut(&mut self, id: ProgramId) -> &mut ProgramInfo {
        self.programs
            .get_mut(&id)
            .unwrap_or_else(|| unreachable!("every ProgramId is registered"))
    }
}
