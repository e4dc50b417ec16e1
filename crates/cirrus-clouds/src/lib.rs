//! Cloud cover layer for a globe viewer: flat texture clouds from orbit,
//! volumetric SDF clouds close to the surface.
//!
//! The host engine's material system sits behind [`MaterialBackend`];
//! [`HeadlessBackend`] is a GPU-free implementation for tools and tests.

mod geodesy;
mod layer;
mod material;
mod mode;
mod shader;

pub use geodesy::{Cartographic, Ellipsoid};
pub use layer::{CloudLayer, CloudLayerSettings, LayerError, ModeTransition};
pub use material::{
    CLOUD_MATERIAL_TYPE, CloudUniform, CloudUniforms, HeadlessBackend, HeadlessMaterial,
    MaterialBackend, MaterialDescriptor, MaterialError, TextureHandle, U_CAMERA_POSITION,
    U_CLOUD_DATA, U_TIME,
};
pub use mode::{CloudRenderMode, DEFAULT_VOLUMETRIC_CEILING_M, ModeSelector};
pub use shader::{
    BUNDLED_CLOUD_SHADER, DEFAULT_FRAGMENT_SHADER, ShaderError, ShaderOrigin, ShaderSource,
};
