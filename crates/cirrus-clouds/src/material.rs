//! Cloud material description, GPU uniform packing, and the seam to the host
//! engine's material system.

use bytemuck::{Pod, Zeroable};
use glam::DVec3;
use thiserror::Error;
use tracing::debug;

use crate::mode::CloudRenderMode;

/// Fabric type name of the cloud material.
pub const CLOUD_MATERIAL_TYPE: &str = "CloudCover";
/// Elapsed time uniform.
pub const U_TIME: &str = "u_time";
/// Camera position uniform (ECEF, meters).
pub const U_CAMERA_POSITION: &str = "u_cameraPosition";
/// Cloud cover texture uniform.
pub const U_CLOUD_DATA: &str = "u_cloudData";

/// Errors raised by a [`MaterialBackend`] while building a material.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("material '{fabric_type}' has an empty shader source")]
    EmptySource { fabric_type: &'static str },
}

// ---------------------------------------------------------------------------
// Uniforms
// ---------------------------------------------------------------------------

/// Per-frame uniform values on the CPU side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudUniforms {
    /// Seconds since the layer started animating.
    pub time: f32,
    /// Camera position in ECEF meters.
    pub camera_position: DVec3,
    pub mode: CloudRenderMode,
}

impl Default for CloudUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            camera_position: DVec3::ZERO,
            mode: CloudRenderMode::Flat,
        }
    }
}

/// Packed uniform block, 32 bytes, std140-compatible.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CloudUniform {
    /// Camera position, narrowed to f32.
    pub camera_position: [f32; 3],
    pub time: f32,
    /// 1 = volumetric, 0 = flat.
    pub volumetric: u32,
    pub _padding: [u32; 3],
}

impl From<&CloudUniforms> for CloudUniform {
    fn from(u: &CloudUniforms) -> Self {
        Self {
            camera_position: u.camera_position.as_vec3().to_array(),
            time: u.time,
            volumetric: u.mode.shader_flag(),
            _padding: [0; 3],
        }
    }
}

// ---------------------------------------------------------------------------
// Backend seam
// ---------------------------------------------------------------------------

/// Everything the host engine needs to build the cloud material.
#[derive(Debug)]
pub struct MaterialDescriptor<'a, T> {
    pub fabric_type: &'static str,
    /// Shader text.
    pub source: &'a str,
    /// Texture bound to [`U_CLOUD_DATA`].
    pub cloud_data: T,
    /// Initial values for [`U_TIME`] and [`U_CAMERA_POSITION`].
    pub uniforms: CloudUniforms,
}

impl<'a, T> MaterialDescriptor<'a, T> {
    /// Cloud cover material with time 0 and the camera at the origin.
    pub fn cloud_cover(source: &'a str, cloud_data: T) -> Self {
        Self {
            fabric_type: CLOUD_MATERIAL_TYPE,
            source,
            cloud_data,
            uniforms: CloudUniforms::default(),
        }
    }

    /// Uniform names in binding order.
    pub fn uniform_names(&self) -> [&'static str; 3] {
        [U_TIME, U_CAMERA_POSITION, U_CLOUD_DATA]
    }
}

/// The host engine's material system.
pub trait MaterialBackend {
    /// Engine material handle, owned by the cloud layer.
    type Material;
    /// Engine texture handle for the cloud cover data. Kept by the layer so
    /// the material can be rebuilt when the shader changes.
    type Texture: Clone;

    fn create_material(
        &mut self,
        descriptor: MaterialDescriptor<'_, Self::Texture>,
    ) -> Result<Self::Material, MaterialError>;

    /// Push per-frame uniform values into an existing material.
    fn write_uniforms(&mut self, material: &mut Self::Material, uniforms: &CloudUniforms);
}

// ---------------------------------------------------------------------------
// Headless backend
// ---------------------------------------------------------------------------

/// Opaque texture id understood by [`HeadlessBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Material record kept by [`HeadlessBackend`].
#[derive(Clone, Debug)]
pub struct HeadlessMaterial {
    pub id: u64,
    pub fabric_type: &'static str,
    pub source: String,
    pub cloud_data: TextureHandle,
    /// Last uniform block written.
    pub uniform: CloudUniform,
    /// Number of uniform writes since creation.
    pub writes: u64,
}

/// Material backend that records state instead of talking to a GPU.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u64,
    materials_created: u64,
    uniform_writes: u64,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn materials_created(&self) -> u64 {
        self.materials_created
    }

    /// Uniform writes across all materials.
    pub fn uniform_writes(&self) -> u64 {
        self.uniform_writes
    }
}

impl MaterialBackend for HeadlessBackend {
    type Material = HeadlessMaterial;
    type Texture = TextureHandle;

    fn create_material(
        &mut self,
        descriptor: MaterialDescriptor<'_, TextureHandle>,
    ) -> Result<HeadlessMaterial, MaterialError> {
        if descriptor.source.trim().is_empty() {
            return Err(MaterialError::EmptySource {
                fabric_type: descriptor.fabric_type,
            });
        }

        let id = self.next_id;
        self.next_id += 1;
        self.materials_created += 1;
        debug!(
            "Created headless material #{} ({}, texture {:?})",
            id, descriptor.fabric_type, descriptor.cloud_data
        );

        Ok(HeadlessMaterial {
            id,
            fabric_type: descriptor.fabric_type,
            source: descriptor.source.to_string(),
            cloud_data: descriptor.cloud_data,
            uniform: CloudUniform::from(&descriptor.uniforms),
            writes: 0,
        })
    }

    fn write_uniforms(&mut self, material: &mut HeadlessMaterial, uniforms: &CloudUniforms) {
        material.uniform = CloudUniform::from(uniforms);
        material.writes += 1;
        self.uniform_writes += 1;
    }
}
