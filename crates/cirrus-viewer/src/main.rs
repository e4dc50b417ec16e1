//! `cirrus`: headless cloud layer driver.
//!
//! Either views the globe from `--altitude-km` or runs a scripted descent from
//! the configured start altitude to the surface, logging every cloud mode
//! change. The shader file is re-read once per simulated second, so edits show
//! up while the descent runs.
//!
//! Run with: `cargo run -p cirrus-viewer -- --altitude-km 50`

use std::process::ExitCode;

use cirrus_clouds::{Cartographic, HeadlessBackend, TextureHandle};
use cirrus_config::{CliArgs, Config, default_config_dir};
use cirrus_viewer::{FlyTo, Viewer, ViewerError, format_status};
use clap::Parser;
use tracing::{debug, error, info};

/// Height above the surface where the scripted descent ends.
const DESCENT_FLOOR_M: f64 = 10_000.0;
/// Length of the scripted descent in seconds.
const DESCENT_DURATION_S: f64 = 10.0;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("cirrus: {err}; using defaults");
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    cirrus_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );

    match run(&config, args.altitude_km.is_some()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, single_view: bool) -> Result<(), ViewerError> {
    let shader = match &config.clouds.shader_path {
        Some(path) => path.display().to_string(),
        None => "bundled".to_string(),
    };
    info!(
        "Cloud shader: {} | volumetric ceiling: {:.1} km",
        shader,
        config.clouds.volumetric_ceiling_m / 1000.0
    );

    let mut viewer = Viewer::new(config, HeadlessBackend::new(), TextureHandle(0))?;
    if viewer.cloud_layer().shader().is_fallback() {
        info!("Shader file unavailable, using the default cloud shader");
    }

    if single_view {
        // --altitude-km already placed the camera; let a second of frames render.
        viewer.run_for(1.0);
    } else {
        let surface = Cartographic::from_degrees(
            config.camera.start_longitude_deg,
            config.camera.start_latitude_deg,
            DESCENT_FLOOR_M,
        );
        let destination = viewer.ellipsoid().cartographic_to_cartesian(surface);
        viewer.fly_to(FlyTo::new(destination).with_duration(DESCENT_DURATION_S))?;

        for _ in 0..=DESCENT_DURATION_S as u32 {
            for transition in viewer.run_for(1.0) {
                info!(
                    "Transition {:?} -> {} at {:.1} km",
                    transition.from,
                    transition.to,
                    transition.altitude_m / 1000.0
                );
            }
            match viewer.reload_shader() {
                Ok(true) => info!("Cloud shader changed, material rebuilt"),
                Ok(false) => {}
                Err(err) => debug!("Shader reload skipped: {err}"),
            }
        }
    }

    let snapshot = viewer.snapshot();
    info!(
        "{} | frames: {} | t={:.2}s",
        format_status(snapshot.mode, snapshot.altitude_m),
        snapshot.frame,
        snapshot.time_s
    );

    viewer.destroy();
    Ok(())
}
