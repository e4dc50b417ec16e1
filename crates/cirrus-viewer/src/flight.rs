//! Animated camera flights between two views.

use std::f64::consts::{PI, TAU};

use cirrus_clouds::{Cartographic, Ellipsoid};
use glam::DVec3;

use crate::camera::{Camera, Orientation};

/// A `flyTo` request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlyTo {
    /// ECEF destination in meters.
    pub destination: DVec3,
    /// Final orientation; the current one is kept when `None`.
    pub orientation: Option<Orientation>,
    /// Flight time in seconds; the viewer default is used when `None`.
    /// Zero or negative jumps immediately.
    pub duration: Option<f64>,
}

impl FlyTo {
    pub fn new(destination: DVec3) -> Self {
        Self {
            destination,
            orientation: None,
            duration: None,
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }
}

/// Smoothstep easing: 3t² − 2t³ for t in [0, 1].
pub(crate) fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Signed shortest angular difference `to - from`, in (-π, π].
fn angle_delta(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(TAU);
    if d > PI { d - TAU } else { d }
}

/// In-progress flight. Interpolates in cartographic space so the camera
/// follows the globe rather than cutting through it.
#[derive(Clone, Debug)]
pub(crate) struct Flight {
    start: Cartographic,
    end: Cartographic,
    end_position: DVec3,
    start_orientation: Orientation,
    end_orientation: Orientation,
    duration: f64,
    elapsed: f64,
}

impl Flight {
    pub(crate) fn new(
        ellipsoid: &Ellipsoid,
        from: &Camera,
        request: &FlyTo,
        duration: f64,
    ) -> Self {
        Self {
            start: from.cartographic(ellipsoid),
            end: ellipsoid.cartesian_to_cartographic(request.destination),
            end_position: request.destination,
            start_orientation: from.orientation,
            end_orientation: request.orientation.unwrap_or(from.orientation),
            duration,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` seconds. Returns `true` once the flight has arrived.
    pub(crate) fn advance(&mut self, dt: f64) -> bool {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.is_finished()
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Camera at the current point of the flight.
    pub(crate) fn sample(&self, ellipsoid: &Ellipsoid) -> Camera {
        if self.is_finished() {
            return Camera::new(self.end_position, self.end_orientation);
        }

        let t = smoothstep(self.elapsed / self.duration);
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        let turn = |a: f64, b: f64| a + angle_delta(a, b) * t;

        let position = ellipsoid.cartographic_to_cartesian(Cartographic::new(
            turn(self.start.longitude, self.end.longitude),
            lerp(self.start.latitude, self.end.latitude),
            lerp(self.start.height, self.end.height),
        ));
        let orientation = Orientation::new(
            turn(self.start_orientation.heading, self.end_orientation.heading),
            lerp(self.start_orientation.pitch, self.end_orientation.pitch),
            turn(self.start_orientation.roll, self.end_orientation.roll),
        );
        Camera::new(position, orientation)
    }
}
