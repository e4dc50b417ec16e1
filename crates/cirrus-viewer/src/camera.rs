//! Globe camera: ECEF position plus heading/pitch/roll.

use cirrus_clouds::{Cartographic, Ellipsoid};
use glam::DVec3;

/// Camera orientation in radians, relative to the local east-north-up frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation {
    /// Rotation from north, clockwise.
    pub heading: f64,
    /// Rotation above the horizon; -π/2 looks straight down.
    pub pitch: f64,
    pub roll: f64,
}

impl Orientation {
    pub fn new(heading: f64, pitch: f64, roll: f64) -> Self {
        Self {
            heading,
            pitch,
            roll,
        }
    }

    /// Straight down at the globe.
    pub fn top_down() -> Self {
        Self::new(0.0, -std::f64::consts::FRAC_PI_2, 0.0)
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::top_down()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// ECEF position in meters.
    pub position: DVec3,
    pub orientation: Orientation,
}

impl Camera {
    pub fn new(position: DVec3, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Position in geodetic coordinates.
    pub fn cartographic(&self, ellipsoid: &Ellipsoid) -> Cartographic {
        ellipsoid.cartesian_to_cartographic(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_orientation_looks_down() {
        let o = Orientation::default();
        assert_eq!(o.heading, 0.0);
        assert_eq!(o.pitch, -std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_camera_cartographic() {
        let e = Ellipsoid::WGS84;
        let c = Cartographic::from_degrees(10.0, 20.0, 30_000.0);
        let camera = Camera::new(e.cartographic_to_cartesian(c), Orientation::default());
        let back = camera.cartographic(&e);
        assert!((back.height - 30_000.0).abs() < 1e-3);
    }
}
