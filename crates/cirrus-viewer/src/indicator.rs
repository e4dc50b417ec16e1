//! On-screen cloud mode indicator.

use cirrus_clouds::CloudRenderMode;

/// Text shown by the mode indicator, e.g. `Mode: Volumetric (SDF)`.
pub fn format_mode(mode: CloudRenderMode) -> String {
    format!("Mode: {}", mode.label())
}

/// Indicator text plus altitude, e.g. `Mode: Flat (texture) | ALT: 5000.0 km`.
pub fn format_status(mode: CloudRenderMode, altitude_m: f64) -> String {
    format!("{} | ALT: {:.1} km", format_mode(mode), altitude_m / 1000.0)
}

/// The `#mode` element of the viewer overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModeIndicator {
    text: String,
    visible: bool,
    mode: CloudRenderMode,
}

impl ModeIndicator {
    pub fn new(mode: CloudRenderMode, visible: bool) -> Self {
        Self {
            text: format_mode(mode),
            visible,
            mode,
        }
    }

    /// Update the displayed mode. Returns `true` if the text changed.
    pub fn set_mode(&mut self, mode: CloudRenderMode) -> bool {
        if mode == self.mode {
            return false;
        }
        self.mode = mode;
        self.text = format_mode(mode);
        true
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
