//! Cloud shader source loading with a bundled default, an inline fallback
//! and hot-reload.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;
use tracing::{debug, info};

/// SDF cloud shader shipped with this crate. Used when no shader file is
/// configured.
pub const BUNDLED_CLOUD_SHADER: &str = include_str!("../shaders/clouds.glsl");

/// Fragment shader used when a configured shader file cannot be read.
pub const DEFAULT_FRAGMENT_SHADER: &str = "
        void main() {
          gl_FragColor = vec4(1.0, 1.0, 1.0, 0.5);
        }
      ";

/// Error types for strict shader loading.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read shader file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where a [`ShaderSource`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderOrigin {
    /// [`BUNDLED_CLOUD_SHADER`], compiled into the crate.
    Bundled,
    /// Read from this file.
    File(PathBuf),
    /// The file at `attempted` could not be read; the default shader is used.
    Fallback { attempted: PathBuf },
}

/// Immutable cloud shader source text.
///
/// Cloning shares the underlying string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    text: Arc<str>,
    origin: ShaderOrigin,
}

impl ShaderSource {
    /// Read the shader at `path`, substituting [`DEFAULT_FRAGMENT_SHADER`] on
    /// any failure. Never fails.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(source) => source,
            Err(err) => {
                debug!("Using default cloud shader: {}", err);
                Self::fallback(path)
            }
        }
    }

    /// Read the shader at `path`.
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ShaderError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ShaderError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        info!("Loaded cloud shader from {}", path.display());
        Ok(Self {
            text: text.into(),
            origin: ShaderOrigin::File(path.to_path_buf()),
        })
    }

    /// The shader bundled with the crate.
    pub fn bundled() -> Self {
        Self {
            text: BUNDLED_CLOUD_SHADER.into(),
            origin: ShaderOrigin::Bundled,
        }
    }

    /// Load `path` if given, otherwise use the bundled shader.
    pub fn resolve(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path),
            None => Self::bundled(),
        }
    }

    /// The default shader, recording the path that failed.
    pub fn fallback(attempted: impl Into<PathBuf>) -> Self {
        Self {
            text: DEFAULT_FRAGMENT_SHADER.into(),
            origin: ShaderOrigin::Fallback {
                attempted: attempted.into(),
            },
        }
    }

    /// Re-read the file this source was (or should have been) loaded from.
    ///
    /// Returns `Some(new_source)` if the text changed, `None` otherwise. The
    /// bundled shader never changes.
    pub fn reload(&self) -> Result<Option<Self>, ShaderError> {
        let Some(path) = self.path() else {
            return Ok(None);
        };
        let reloaded = Self::try_load(path)?;
        if reloaded.text == self.text && reloaded.origin == self.origin {
            Ok(None)
        } else {
            info!("Reloaded cloud shader from {}", path.display());
            Ok(Some(reloaded))
        }
    }

    /// Shader text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> &ShaderOrigin {
        &self.origin
    }

    /// Whether the default shader is in use.
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, ShaderOrigin::Fallback { .. })
    }

    /// The file path this source is bound to; `None` for the bundled shader.
    pub fn path(&self) -> Option<&Path> {
        match &self.origin {
            ShaderOrigin::Bundled => None,
            ShaderOrigin::File(path) => Some(path),
            ShaderOrigin::Fallback { attempted } => Some(attempted),
        }
    }
}

impl AsRef<str> for ShaderSource {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDF_SHADER: &str = "uniform float u_time;\nvoid main() { gl_FragColor = vec4(u_time); }\n";

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clouds.glsl");

        let source = ShaderSource::load(&path);
        assert!(source.is_fallback());
        assert!(source.as_str().contains("gl_FragColor"));
        assert_eq!(source.as_str(), DEFAULT_FRAGMENT_SHADER);
        assert_eq!(source.path(), Some(path.as_path()));
    }

    #[test]
    fn test_existing_file_is_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clouds.glsl");
        std::fs::write(&path, SDF_SHADER).unwrap();

        let source = ShaderSource::load(&path);
        assert!(!source.is_fallback());
        assert_eq!(source.as_str(), SDF_SHADER);
        assert_eq!(source.origin(), &ShaderOrigin::File(path));
    }

    #[test]
    fn test_directory_path_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let source = ShaderSource::load(dir.path());
        assert!(source.is_fallback());
    }

    #[test]
    fn test_try_load_reports_missing_file() {
        let result = ShaderSource::try_load("/definitely/not/here/clouds.glsl");
        assert!(matches!(result, Err(ShaderError::FileNotFound { .. })));
    }

    #[test]
    fn test_reload_unchanged_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clouds.glsl");
        std::fs::write(&path, SDF_SHADER).unwrap();

        let source = ShaderSource::load(&path);
        assert!(source.reload().unwrap().is_none());
    }

    #[test]
    fn test_reload_picks_up_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clouds.glsl");
        std::fs::write(&path, SDF_SHADER).unwrap();
        let source = ShaderSource::load(&path);

        std::fs::write(&path, "void main() {}").unwrap();
        let reloaded = source.reload().unwrap().unwrap();
        assert_eq!(reloaded.as_str(), "void main() {}");
    }

    #[test]
    fn test_reload_replaces_fallback_once_file_appears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clouds.glsl");
        let source = ShaderSource::load(&path);
        assert!(matches!(
            source.reload(),
            Err(ShaderError::FileNotFound { .. })
        ));

        std::fs::write(&path, SDF_SHADER).unwrap();
        let reloaded = source.reload().unwrap().unwrap();
        assert!(!reloaded.is_fallback());
    }

    #[test]
    fn test_bundled_shader_is_not_fallback() {
        let source = ShaderSource::resolve(None);
        assert_eq!(source.origin(), &ShaderOrigin::Bundled);
        assert!(!source.is_fallback());
        assert!(source.path().is_none());
        assert_ne!(source.as_str(), DEFAULT_FRAGMENT_SHADER);
        for uniform in ["u_time", "u_cameraPosition", "u_cloudData", "gl_FragColor"] {
            assert!(source.as_str().contains(uniform), "missing {uniform}");
        }
    }

    #[test]
    fn test_bundled_reload_is_noop() {
        assert!(ShaderSource::bundled().reload().unwrap().is_none());
    }

    #[test]
    fn test_resolve_with_missing_path_falls_back() {
        let source = ShaderSource::resolve(Some(Path::new("/definitely/not/here.glsl")));
        assert!(source.is_fallback());
    }

    #[test]
    fn test_clone_shares_text() {
        let source = ShaderSource::fallback("missing.glsl");
        let copy = source.clone();
        assert!(Arc::ptr_eq(&source.text, &copy.text));
    }
}
