//! Configuration system for the Cirrus cloud layer.
//!
//! Settings persist to disk as RON files, can be overridden from the command
//! line via clap, and support hot-reload detection. Unknown fields are ignored
//! and missing sections fall back to defaults.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, CloudsConfig, Config, DebugConfig, GlobeConfig, GlobeShape, default_config_dir,
};
pub use error::ConfigError;
