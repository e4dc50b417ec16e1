//! Headless globe viewer hosting the cloud layer.
//!
//! Mirrors the scripting surface of a browser globe viewer (`flyTo`,
//! `setView`, a mode indicator) so camera scenarios can be driven and checked
//! without a window or GPU.

mod camera;
mod flight;
mod indicator;
mod viewer;

pub use camera::{Camera, Orientation};
pub use flight::FlyTo;
pub use indicator::{ModeIndicator, format_mode, format_status};
pub use viewer::{FIXED_DT, FrameSnapshot, Viewer, ViewerError};
