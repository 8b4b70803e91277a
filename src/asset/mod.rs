//! Asset finalization: minification, source maps and fingerprinted artifacts.

mod artifact;
mod digest;
mod error;
mod events;
mod finalize;
pub mod gzip;
pub mod minify;
mod resolve;
pub mod sourcemap;

// Types
pub use artifact::{ArtifactStore, PersistedArtifact};
pub use digest::ContentHash;
pub use error::{FinalizeError, MapOrigin, Result};
pub use events::{ArtifactEvent, ArtifactKind, EventSink, LogSink, NullSink};
pub use resolve::{UrlCallback, UrlRoot, join_segments};
pub use sourcemap::SourceMap;

// Compression hook
pub use finalize::{CompressedOutput, CompressionRequest, Finalizer, default_logical_name};
pub use minify::{MinifiedWithMap, Minify, OxcMinifier};
