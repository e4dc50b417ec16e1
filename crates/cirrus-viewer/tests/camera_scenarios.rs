//! Camera scenarios: drive the viewer the way a page script would and check
//! the cloud mode it reports.

use cirrus_clouds::{Cartographic, CloudRenderMode, HeadlessBackend, TextureHandle};
use cirrus_config::{Config, GlobeShape};
use cirrus_viewer::{FlyTo, FrameSnapshot, Orientation, Viewer};
use glam::DVec3;

const SF_LON: f64 = -122.4194;
const SF_LAT: f64 = 37.7749;

fn load_viewer(config: Config) -> Viewer {
    Viewer::new(&config, HeadlessBackend::new(), TextureHandle(7)).unwrap()
}

fn page() -> Viewer {
    load_viewer(Config::default())
}

fn over_sf(viewer: &Viewer, altitude_m: f64) -> DVec3 {
    viewer
        .ellipsoid()
        .cartographic_to_cartesian(Cartographic::from_degrees(SF_LON, SF_LAT, altitude_m))
}

/// Set the view, then let a second of frames render before capturing.
fn capture(viewer: &mut Viewer, destination: DVec3, pitch: f64) -> FrameSnapshot {
    viewer
        .set_view(destination, Orientation::new(0.0, pitch, 0.0))
        .unwrap();
    viewer.run_for(1.0);
    viewer.snapshot()
}

#[test]
fn cloud_layer_is_initialized_on_load() {
    let viewer = page();
    assert!(viewer.cloud_layer().has_material());
    assert!(!viewer.cloud_layer().shader().is_fallback());
    assert!(viewer.indicator().is_visible());
    assert_eq!(viewer.backend().materials_created(), 1);
}

#[test]
fn close_flight_switches_to_volumetric() {
    let mut viewer = page();
    viewer
        .fly_to(FlyTo::new(DVec3::new(0.0, 0.0, 100_000.0)).with_duration(0.0))
        .unwrap();
    viewer.run_for(1.0);

    assert!(viewer.cloud_layer().is_volumetric_mode());
    assert_eq!(viewer.snapshot().uniform.volumetric, 1);
}

#[test]
fn far_flight_uses_flat_texture() {
    let mut viewer = page();
    viewer
        .fly_to(FlyTo::new(DVec3::new(0.0, 0.0, 20_000_000.0)).with_duration(0.0))
        .unwrap();
    viewer.run_for(1.0);

    assert!(!viewer.cloud_layer().is_volumetric_mode());
    assert!(viewer.mode_text().contains("Flat"));
}

#[test]
fn volumetric_clouds_at_close_range() {
    let mut viewer = page();
    let destination = over_sf(&viewer, 50_000.0);
    let snapshot = capture(&mut viewer, destination, -0.5);

    assert!(snapshot.mode_text.contains("Volumetric"));
    assert!((snapshot.altitude_m - 50_000.0).abs() < 1.0);
}

#[test]
fn volumetric_clouds_just_below_100km() {
    let mut viewer = page();
    let destination = over_sf(&viewer, 99_000.0);
    let snapshot = capture(&mut viewer, destination, -0.5);
    assert!(snapshot.mode_text.contains("Volumetric"));
}

#[test]
fn volumetric_clouds_at_exactly_100km() {
    // Over the pole of a spherical globe the altitude is |z| - r with no
    // rounding, so the camera sits on the ceiling itself.
    let mut config = Config::default();
    config.globe.shape = GlobeShape::Sphere {
        radius_m: 6_371_000.0,
    };
    let mut viewer = load_viewer(config);
    let snapshot = capture(&mut viewer, DVec3::new(0.0, 0.0, 6_471_000.0), -0.5);

    assert_eq!(snapshot.altitude_m, 100_000.0);
    assert_eq!(snapshot.mode, CloudRenderMode::Volumetric);
    assert_eq!(snapshot.mode_text, "Mode: Volumetric (SDF)");
    assert_eq!(snapshot.uniform.volumetric, 1);
}

#[test]
fn flat_clouds_at_far_range() {
    let mut viewer = page();
    let destination = over_sf(&viewer, 5_000_000.0);
    let snapshot = capture(&mut viewer, destination, -1.0);

    assert!(snapshot.mode_text.contains("Flat"));
    assert_eq!(snapshot.mode, CloudRenderMode::Flat);
}

#[test]
fn transition_zone_capture_at_100km() {
    let mut viewer = page();
    let destination = over_sf(&viewer, 100_000.0);
    let snapshot = capture(&mut viewer, destination, -0.7);

    assert!((snapshot.altitude_m - 100_000.0).abs() < 1.0);
    assert_eq!(
        snapshot.mode_text.contains("Volumetric"),
        snapshot.mode.is_volumetric()
    );
}

#[test]
fn global_view_capture() {
    let mut viewer = page();
    let destination = over_sf(&viewer, 10_000_000.0);
    let snapshot = capture(&mut viewer, destination, -1.2);

    assert_eq!(snapshot.mode, CloudRenderMode::Flat);
    assert_eq!(snapshot.camera.orientation.pitch, -1.2);
}

#[test]
fn round_trip_descent_and_ascent() {
    let mut viewer = page();
    let low = over_sf(&viewer, 20_000.0);
    let high = over_sf(&viewer, 8_000_000.0);

    viewer.fly_to(FlyTo::new(low).with_duration(2.0)).unwrap();
    let down = viewer.run_for(3.0);
    viewer.fly_to(FlyTo::new(high).with_duration(2.0)).unwrap();
    let up = viewer.run_for(3.0);

    assert_eq!(down.len(), 1);
    assert_eq!(down[0].to, CloudRenderMode::Volumetric);
    assert_eq!(up.len(), 1);
    assert_eq!(up[0].to, CloudRenderMode::Flat);
}

#[test]
fn hysteresis_prevents_flicker_at_ceiling() {
    let mut config = Config::default();
    config.clouds.hysteresis_m = 20_000.0;
    let mut viewer = load_viewer(config);

    viewer
        .set_view(over_sf(&viewer, 50_000.0), Orientation::default())
        .unwrap();
    viewer.tick(0.1);
    assert!(viewer.cloud_layer().is_volumetric_mode());

    for altitude in [101_000.0, 99_000.0, 105_000.0, 95_000.0, 109_000.0] {
        viewer
            .set_view(over_sf(&viewer, altitude), Orientation::default())
            .unwrap();
        assert!(viewer.tick(0.1).is_none(), "mode flipped at {altitude} m");
    }

    viewer
        .set_view(over_sf(&viewer, 111_000.0), Orientation::default())
        .unwrap();
    assert_eq!(
        viewer.tick(0.1).map(|t| t.to),
        Some(CloudRenderMode::Flat)
    );
}

#[test]
fn destroyed_layer_keeps_rendering() {
    let mut viewer = page();
    viewer.destroy();
    let destination = over_sf(&viewer, 30_000.0);
    let snapshot = capture(&mut viewer, destination, -0.5);

    assert!(!viewer.cloud_layer().has_material());
    assert!(snapshot.mode_text.contains("Volumetric"));
}
