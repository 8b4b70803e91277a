//! Finalizer error types.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where a source map came from, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapOrigin {
    /// Produced by the minifier for raw source.
    Minifier,
    /// Read from the sidecar `.map` file of a bundle.
    Sidecar,
}

impl std::fmt::Display for MapOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minifier => f.write_str("minifier"),
            Self::Sidecar => f.write_str("sidecar"),
        }
    }
}

/// Errors that abort finalizing a single asset.
#[derive(Debug, Error)]
pub enum FinalizeError {
    #[error("malformed source map from {origin}")]
    MalformedMap {
        origin: MapOrigin,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing source map `{}` for bundled asset", path.display())]
    MissingSourceMap { path: PathBuf },

    #[error("failed to minify `{}`: {message}", path.display())]
    Minify { path: PathBuf, message: String },

    #[error("IO error at `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FinalizeError {
    /// Attach a path to an IO error.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

pub type Result<T, E = FinalizeError> = std::result::Result<T, E>;
