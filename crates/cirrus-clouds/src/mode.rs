//! Altitude-based cloud render mode selection.

use std::fmt;

use cirrus_config::CloudsConfig;
use serde::{Deserialize, Serialize};

/// Altitude (meters) at or below which clouds render volumetrically.
pub const DEFAULT_VOLUMETRIC_CEILING_M: f64 = 100_000.0;

/// How the cloud layer is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloudRenderMode {
    /// Ray-marched signed-distance-field clouds, used close to the surface.
    Volumetric,
    /// A 2D cloud cover texture draped on the globe, used from far away.
    Flat,
}

impl CloudRenderMode {
    /// Text shown by the viewer's mode indicator.
    pub fn label(self) -> &'static str {
        match self {
            Self::Volumetric => "Volumetric (SDF)",
            Self::Flat => "Flat (texture)",
        }
    }

    pub fn is_volumetric(self) -> bool {
        matches!(self, Self::Volumetric)
    }

    /// Value of the shader's mode uniform: 1 for volumetric, 0 for flat.
    pub fn shader_flag(self) -> u32 {
        match self {
            Self::Volumetric => 1,
            Self::Flat => 0,
        }
    }
}

impl fmt::Display for CloudRenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Volumetric => "Volumetric",
            Self::Flat => "Flat",
        })
    }
}

/// Chooses the render mode from the camera's height above the globe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeSelector {
    /// Altitude (meters) at or below which clouds are volumetric.
    pub volumetric_ceiling_m: f64,
    /// Band (meters) centered on the ceiling inside which the current mode is
    /// kept, so a camera hovering at the ceiling does not flicker.
    pub hysteresis_m: f64,
}

impl Default for ModeSelector {
    fn default() -> Self {
        Self {
            volumetric_ceiling_m: DEFAULT_VOLUMETRIC_CEILING_M,
            hysteresis_m: 0.0,
        }
    }
}

impl ModeSelector {
    /// Stateless classification. The ceiling itself is volumetric, as is any
    /// negative altitude. A NaN altitude is flat.
    pub fn classify(&self, altitude_m: f64) -> CloudRenderMode {
        if altitude_m <= self.volumetric_ceiling_m {
            CloudRenderMode::Volumetric
        } else {
            CloudRenderMode::Flat
        }
    }

    /// Stateful selection honoring the hysteresis band.
    ///
    /// With no current mode this is [`classify`](Self::classify).
    pub fn select(&self, current: Option<CloudRenderMode>, altitude_m: f64) -> CloudRenderMode {
        let half_band = self.hysteresis_m * 0.5;
        match current {
            None => self.classify(altitude_m),
            Some(CloudRenderMode::Volumetric) => {
                if altitude_m > self.volumetric_ceiling_m + half_band {
                    CloudRenderMode::Flat
                } else {
                    CloudRenderMode::Volumetric
                }
            }
            Some(CloudRenderMode::Flat) => {
                if altitude_m <= self.volumetric_ceiling_m - half_band {
                    CloudRenderMode::Volumetric
                } else {
                    CloudRenderMode::Flat
                }
            }
        }
    }
}

impl From<&CloudsConfig> for ModeSelector {
    fn from(config: &CloudsConfig) -> Self {
        Self {
            volumetric_ceiling_m: config.volumetric_ceiling_m,
            hysteresis_m: config.hysteresis_m,
        }
    }
}
