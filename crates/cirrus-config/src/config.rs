//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Cloud layer settings.
    pub clouds: CloudsConfig,
    /// Globe shape used for altitude computation.
    pub globe: GlobeConfig,
    /// Initial camera placement and flight defaults.
    pub camera: CameraConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Cloud layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CloudsConfig {
    /// Cloud fragment shader file. `None` uses the shader bundled with the
    /// cloud layer; relative paths resolve against the working directory.
    pub shader_path: Option<PathBuf>,
    /// Altitude (meters) at or below which volumetric clouds are rendered.
    pub volumetric_ceiling_m: f64,
    /// Width (meters) of the band around the ceiling inside which the current
    /// mode is kept. 0.0 disables hysteresis.
    pub hysteresis_m: f64,
}

/// Reference surface for altitude measurement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum GlobeShape {
    /// WGS84 ellipsoid.
    Wgs84,
    /// Perfect sphere with the given radius in meters.
    Sphere { radius_m: f64 },
}

/// Globe configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobeConfig {
    /// Reference surface.
    pub shape: GlobeShape,
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting longitude in degrees.
    pub start_longitude_deg: f64,
    /// Starting latitude in degrees.
    pub start_latitude_deg: f64,
    /// Starting height above the globe surface in meters.
    pub start_altitude_m: f64,
    /// Duration used by flights that don't specify one, in seconds.
    pub default_flight_duration_s: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Show the cloud mode indicator.
    pub show_mode_indicator: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for CloudsConfig {
    fn default() -> Self {
        Self {
            shader_path: None,
            volumetric_ceiling_m: 100_000.0,
            hysteresis_m: 0.0,
        }
    }
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            shape: GlobeShape::Wgs84,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_longitude_deg: -122.4,
            start_latitude_deg: 37.8,
            start_altitude_m: 20_000_000.0,
            default_flight_duration_s: 3.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_mode_indicator: true,
            log_level: "info".to_string(),
        }
    }
}

/// Default config directory: `<platform config dir>/cirrus`, or `./config`
/// when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("cirrus"))
        .unwrap_or_else(|| PathBuf::from("config"))
}

// --- Validation ---

impl Config {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let clouds = &self.clouds;
        if !(clouds.volumetric_ceiling_m.is_finite() && clouds.volumetric_ceiling_m > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "clouds.volumetric_ceiling_m",
                reason: format!("must be positive, got {}", clouds.volumetric_ceiling_m),
            });
        }
        if !(clouds.hysteresis_m.is_finite() && clouds.hysteresis_m >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "clouds.hysteresis_m",
                reason: format!("must be non-negative, got {}", clouds.hysteresis_m),
            });
        }
        if clouds.hysteresis_m >= 2.0 * clouds.volumetric_ceiling_m {
            return Err(ConfigError::InvalidValue {
                field: "clouds.hysteresis_m",
                reason: "band must not reach below the surface".to_string(),
            });
        }
        if let GlobeShape::Sphere { radius_m } = self.globe.shape
            && !(radius_m.is_finite() && radius_m > 0.0)
        {
            return Err(ConfigError::InvalidValue {
                field: "globe.shape.radius_m",
                reason: format!("must be positive, got {radius_m}"),
            });
        }
        let duration = self.camera.default_flight_duration_s;
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "camera.default_flight_duration_s",
                reason: format!("must be non-negative, got {duration}"),
            });
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
