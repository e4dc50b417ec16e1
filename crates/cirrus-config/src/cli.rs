//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Cirrus command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "cirrus", about = "Altitude-switched cloud layer for a globe viewer")]
pub struct CliArgs {
    /// Cloud shader file, read instead of the bundled shader.
    #[arg(long)]
    pub shader: Option<PathBuf>,

    /// Altitude (km) at or below which clouds are volumetric.
    #[arg(long)]
    pub volumetric_ceiling_km: Option<f64>,

    /// Hysteresis band (km) around the volumetric ceiling.
    #[arg(long)]
    pub hysteresis_km: Option<f64>,

    /// View the globe from this altitude (km) instead of running the descent.
    #[arg(long)]
    pub altitude_km: Option<f64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref path) = args.shader {
            self.clouds.shader_path = Some(path.clone());
        }
        if let Some(km) = args.volumetric_ceiling_km {
            self.clouds.volumetric_ceiling_m = km * 1000.0;
        }
        if let Some(km) = args.hysteresis_km {
            self.clouds.hysteresis_m = km * 1000.0;
        }
        if let Some(km) = args.altitude_km {
            self.camera.start_altitude_m = km * 1000.0;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            volumetric_ceiling_km: Some(80.0),
            altitude_km: Some(50.0),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.clouds.volumetric_ceiling_m, 80_000.0);
        assert_eq!(config.camera.start_altitude_m, 50_000.0);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.clouds.hysteresis_m, 0.0);
        assert!(config.clouds.shader_path.is_none());
    }

    #[test]
    fn test_cli_shader_override() {
        let mut config = Config::default();
        let args = CliArgs {
            shader: Some(PathBuf::from("assets/sdf.glsl")),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(
            config.clouds.shader_path,
            Some(PathBuf::from("assets/sdf.glsl"))
        );
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "cirrus",
            "--shader",
            "assets/sdf.glsl",
            "--hysteresis-km",
            "10",
        ]);
        assert_eq!(args.shader, Some(PathBuf::from("assets/sdf.glsl")));
        assert_eq!(args.hysteresis_km, Some(10.0));
        assert!(args.altitude_km.is_none());
    }
}
