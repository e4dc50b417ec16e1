//! The cloud layer: owns the shader source and the engine material, and
//! switches between flat and volumetric rendering as the camera moves.

use std::path::PathBuf;

use cirrus_config::Config;
use glam::DVec3;
use thiserror::Error;
use tracing::{debug, info};

use crate::geodesy::Ellipsoid;
use crate::material::{CloudUniforms, MaterialBackend, MaterialDescriptor, MaterialError};
use crate::mode::{CloudRenderMode, ModeSelector};
use crate::shader::{ShaderError, ShaderSource};

#[derive(Debug, Error)]
pub enum LayerError {
    #[error("failed to create cloud material: {0}")]
    Material(#[from] MaterialError),

    #[error("failed to reload cloud shader: {0}")]
    Shader(#[from] ShaderError),
}

/// Construction parameters for a [`CloudLayer`].
#[derive(Clone, Debug, PartialEq)]
pub struct CloudLayerSettings {
    /// Shader file; the bundled shader is used when `None`.
    pub shader_path: Option<PathBuf>,
    pub selector: ModeSelector,
    /// Surface that altitudes are measured against.
    pub ellipsoid: Ellipsoid,
}

impl Default for CloudLayerSettings {
    fn default() -> Self {
        Self {
            shader_path: None,
            selector: ModeSelector::default(),
            ellipsoid: Ellipsoid::WGS84,
        }
    }
}

impl From<&Config> for CloudLayerSettings {
    fn from(config: &Config) -> Self {
        Self {
            shader_path: config.clouds.shader_path.clone(),
            selector: ModeSelector::from(&config.clouds),
            ellipsoid: Ellipsoid::from(config.globe.shape),
        }
    }
}

/// A change of render mode observed during [`CloudLayer::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeTransition {
    /// `None` on the first update.
    pub from: Option<CloudRenderMode>,
    pub to: CloudRenderMode,
    pub altitude_m: f64,
}

/// Cloud cover layer bound to a [`MaterialBackend`].
///
/// Lifecycle: [`new`](Self::new) → [`initialize`](Self::initialize) →
/// [`update`](Self::update) every frame → [`destroy`](Self::destroy).
pub struct CloudLayer<B: MaterialBackend> {
    shader: ShaderSource,
    material: Option<B::Material>,
    cloud_data: Option<B::Texture>,
    selector: ModeSelector,
    ellipsoid: Ellipsoid,
    mode: Option<CloudRenderMode>,
    uniforms: CloudUniforms,
    altitude_m: f64,
}

impl<B: MaterialBackend> CloudLayer<B> {
    /// Create the layer and load its shader. Without a shader path the
    /// bundled shader is used; an unreadable file falls back to the default
    /// shader.
    pub fn new(settings: CloudLayerSettings) -> Self {
        let shader = ShaderSource::resolve(settings.shader_path.as_deref());
        Self::with_shader(shader, settings)
    }

    /// Create the layer around an already loaded shader.
    pub fn with_shader(shader: ShaderSource, settings: CloudLayerSettings) -> Self {
        Self {
            shader,
            material: None,
            cloud_data: None,
            selector: settings.selector,
            ellipsoid: settings.ellipsoid,
            mode: None,
            uniforms: CloudUniforms::default(),
            altitude_m: f64::INFINITY,
        }
    }

    /// Build the cloud material around `cloud_data`. The texture is not
    /// validated. Calling this again replaces the existing material.
    pub fn initialize(
        &mut self,
        backend: &mut B,
        cloud_data: B::Texture,
    ) -> Result<(), LayerError> {
        let descriptor =
            MaterialDescriptor::cloud_cover(self.shader.as_str(), cloud_data.clone());
        let material = backend.create_material(descriptor)?;

        if self.material.replace(material).is_some() {
            debug!("Replaced existing cloud material");
        }
        self.cloud_data = Some(cloud_data);
        info!("Cloud layer initialized with SDF shader");
        Ok(())
    }

    /// Re-read the shader file and, if it changed, rebuild the material
    /// around the same cloud texture. Returns whether the shader changed.
    ///
    /// A rebuild failure keeps both the previous shader and material.
    pub fn reload_shader(&mut self, backend: &mut B) -> Result<bool, LayerError> {
        let Some(shader) = self.shader.reload()? else {
            return Ok(false);
        };
        let previous = std::mem::replace(&mut self.shader, shader);

        if self.material.is_some()
            && let Some(cloud_data) = self.cloud_data.clone()
            && let Err(err) = self.initialize(backend, cloud_data)
        {
            self.shader = previous;
            return Err(err);
        }
        Ok(true)
    }

    /// Per-frame update: pick the render mode for the camera altitude and,
    /// if a material exists, refresh its uniforms.
    ///
    /// Returns the mode change, if any. Safe to call after [`destroy`](Self::destroy).
    pub fn update(
        &mut self,
        backend: &mut B,
        time: f32,
        camera_position: DVec3,
    ) -> Option<ModeTransition> {
        let altitude_m = self.ellipsoid.height_above_surface(camera_position);
        let mode = self.selector.select(self.mode, altitude_m);

        let transition = (self.mode != Some(mode)).then(|| ModeTransition {
            from: self.mode,
            to: mode,
            altitude_m,
        });
        if let Some(t) = &transition {
            info!("Cloud mode -> {} at {:.1} km", t.to, altitude_m / 1000.0);
        }

        self.mode = Some(mode);
        self.altitude_m = altitude_m;
        self.uniforms = CloudUniforms {
            time,
            camera_position,
            mode,
        };

        if let Some(material) = self.material.as_mut() {
            backend.write_uniforms(material, &self.uniforms);
        }

        transition
    }

    /// Release the material. Idempotent.
    pub fn destroy(&mut self) {
        self.cloud_data = None;
        if self.material.take().is_some() {
            debug!("Cloud layer material released");
        }
    }

    /// Swap in a new shader source. Takes effect on the next
    /// [`initialize`](Self::initialize).
    pub fn set_shader(&mut self, shader: ShaderSource) {
        self.shader = shader;
    }

    /// Current mode; flat until the first update.
    pub fn mode(&self) -> CloudRenderMode {
        self.mode.unwrap_or(CloudRenderMode::Flat)
    }

    pub fn is_volumetric_mode(&self) -> bool {
        self.mode().is_volumetric()
    }

    /// Camera altitude seen by the last update, or infinity before the first.
    pub fn altitude_m(&self) -> f64 {
        self.altitude_m
    }

    /// Uniform values from the last update.
    pub fn uniforms(&self) -> &CloudUniforms {
        &self.uniforms
    }

    pub fn material(&self) -> Option<&B::Material> {
        self.material.as_ref()
    }

    pub fn has_material(&self) -> bool {
        self.material.is_some()
    }

    pub fn shader(&self) -> &ShaderSource {
        &self.shader
    }

    pub fn selector(&self) -> &ModeSelector {
        &self.selector
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }
}
