//! The viewer: camera, clock, flights, and the cloud layer they drive.

use cirrus_clouds::{
    Cartographic, CloudLayer, CloudLayerSettings, CloudRenderMode, CloudUniform, Ellipsoid,
    HeadlessBackend, LayerError, MaterialBackend, ModeTransition,
};
use cirrus_config::{Config, ConfigError};
use glam::DVec3;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::camera::{Camera, Orientation};
use crate::flight::{Flight, FlyTo};
use crate::indicator::{ModeIndicator, format_status};

/// Simulation step used by [`Viewer::run_for`]: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Layer(#[from] LayerError),

    #[error("camera destination is not finite: {0}")]
    InvalidDestination(DVec3),

    #[error("flight duration is not finite: {0}")]
    InvalidDuration(f64),
}

/// State of one rendered frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub time_s: f64,
    pub camera: Camera,
    pub altitude_m: f64,
    pub mode: CloudRenderMode,
    pub mode_text: String,
    /// Uniform block most recently handed to the material.
    pub uniform: CloudUniform,
}

/// Headless globe viewer with a cloud layer attached.
pub struct Viewer<B: MaterialBackend = HeadlessBackend> {
    backend: B,
    ellipsoid: Ellipsoid,
    camera: Camera,
    cloud_layer: CloudLayer<B>,
    indicator: ModeIndicator,
    flight: Option<Flight>,
    default_flight_duration_s: f64,
    clock_s: f64,
    frame: u64,
}

impl<B: MaterialBackend> Viewer<B> {
    /// Build a viewer from `config`, create and initialize its cloud layer
    /// around `cloud_data`, and render the first frame.
    pub fn new(
        config: &Config,
        mut backend: B,
        cloud_data: B::Texture,
    ) -> Result<Self, ViewerError> {
        config.validate()?;

        let settings = CloudLayerSettings::from(config);
        let ellipsoid = settings.ellipsoid;
        let mut cloud_layer = CloudLayer::new(settings);
        cloud_layer.initialize(&mut backend, cloud_data)?;

        let start = Cartographic::from_degrees(
            config.camera.start_longitude_deg,
            config.camera.start_latitude_deg,
            config.camera.start_altitude_m,
        );
        let camera = Camera::new(
            ellipsoid.cartographic_to_cartesian(start),
            Orientation::default(),
        );

        let mut viewer = Self {
            backend,
            ellipsoid,
            camera,
            cloud_layer,
            indicator: ModeIndicator::new(CloudRenderMode::Flat, config.debug.show_mode_indicator),
            flight: None,
            default_flight_duration_s: config.camera.default_flight_duration_s,
            clock_s: 0.0,
            frame: 0,
        };
        viewer.render_frame();
        Ok(viewer)
    }

    /// Start a camera flight. A zero duration moves the camera at once; the
    /// cloud layer sees the new position on the next tick.
    pub fn fly_to(&mut self, request: FlyTo) -> Result<(), ViewerError> {
        check_destination(request.destination)?;

        let duration = request.duration.unwrap_or(self.default_flight_duration_s);
        if !duration.is_finite() {
            return Err(ViewerError::InvalidDuration(duration));
        }
        if duration <= 0.0 {
            self.flight = None;
            self.camera = Camera::new(
                request.destination,
                request.orientation.unwrap_or(self.camera.orientation),
            );
            return Ok(());
        }

        debug!(
            "Flying to ({:.0}, {:.0}, {:.0}) over {:.2}s",
            request.destination.x, request.destination.y, request.destination.z, duration
        );
        self.flight = Some(Flight::new(&self.ellipsoid, &self.camera, &request, duration));
        Ok(())
    }

    /// Place the camera immediately, cancelling any flight.
    pub fn set_view(
        &mut self,
        destination: DVec3,
        orientation: Orientation,
    ) -> Result<(), ViewerError> {
        check_destination(destination)?;
        self.flight = None;
        self.camera = Camera::new(destination, orientation);
        Ok(())
    }

    /// Advance the clock by `dt` seconds, move the camera along any active
    /// flight, and render a frame.
    pub fn tick(&mut self, dt: f64) -> Option<ModeTransition> {
        self.clock_s += dt.max(0.0);

        let arrived = match self.flight.as_mut() {
            Some(flight) => {
                let arrived = flight.advance(dt);
                self.camera = flight.sample(&self.ellipsoid);
                arrived
            }
            None => false,
        };
        if arrived {
            self.flight = None;
        }

        self.render_frame()
    }

    /// Tick at [`FIXED_DT`] for `seconds`, returning every mode change.
    /// A non-finite `seconds` runs no frames.
    pub fn run_for(&mut self, seconds: f64) -> Vec<ModeTransition> {
        if !seconds.is_finite() {
            warn!("Ignoring run of non-finite length {}", seconds);
            return Vec::new();
        }
        let steps = (seconds / FIXED_DT).ceil().max(0.0) as u64;
        (0..steps).filter_map(|_| self.tick(FIXED_DT)).collect()
    }

    fn render_frame(&mut self) -> Option<ModeTransition> {
        let transition = self.cloud_layer.update(
            &mut self.backend,
            self.clock_s as f32,
            self.camera.position,
        );
        if self.indicator.set_mode(self.cloud_layer.mode()) {
            info!("{}", format_status(self.cloud_layer.mode(), self.altitude_m()));
        }
        self.frame += 1;
        transition
    }

    /// Capture the current frame state.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            frame: self.frame,
            time_s: self.clock_s,
            camera: self.camera,
            altitude_m: self.cloud_layer.altitude_m(),
            mode: self.cloud_layer.mode(),
            mode_text: self.indicator.text().to_string(),
            uniform: CloudUniform::from(self.cloud_layer.uniforms()),
        }
    }

    /// Re-read the cloud shader file and rebuild the material if it changed.
    /// Returns whether the shader changed.
    pub fn reload_shader(&mut self) -> Result<bool, ViewerError> {
        Ok(self.cloud_layer.reload_shader(&mut self.backend)?)
    }

    /// Release the cloud layer's material. The viewer keeps ticking.
    pub fn destroy(&mut self) {
        self.cloud_layer.destroy();
    }

    /// Text of the mode indicator.
    pub fn mode_text(&self) -> &str {
        self.indicator.text()
    }

    pub fn indicator(&self) -> &ModeIndicator {
        &self.indicator
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Current camera height above the ellipsoid.
    pub fn altitude_m(&self) -> f64 {
        self.ellipsoid.height_above_surface(self.camera.position)
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    pub fn cloud_layer(&self) -> &CloudLayer<B> {
        &self.cloud_layer
    }

    pub fn cloud_layer_mut(&mut self) -> &mut CloudLayer<B> {
        &mut self.cloud_layer
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    pub fn clock_s(&self) -> f64 {
        self.clock_s
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

fn check_destination(destination: DVec3) -> Result<(), ViewerError> {
    if destination.is_finite() {
        Ok(())
    } else {
        Err(ViewerError::InvalidDestination(destination))
    }
}
