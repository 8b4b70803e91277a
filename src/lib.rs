//! Asset finalizer - minify JavaScript and link it to fingerprinted source maps.
//!
//! A compression hook for asset pipelines. For every asset it writes:
//!
//! ```text
//! <public>/<prefix>/<uncompressed_prefix>/<name>-<hash>.js      (optional)
//! <public>/<prefix>/<sourcemaps_prefix>/<name>-<hash>.js.map
//! ```
//!
//! plus optional `.gz` siblings, and returns the minified code ending with
//! `//# sourceMappingURL=<map url>`.
//!
//! ```ignore
//! use asset_finalizer::{CompressionRequest, Finalizer, FinalizerConfig};
//!
//! let finalizer = Finalizer::new(FinalizerConfig::default());
//! let out = finalizer.compress(&CompressionRequest::new(source, "application", path))?;
//! ```

pub mod asset;
pub mod config;
pub mod logger;

pub use asset::{
    CompressedOutput, CompressionRequest, FinalizeError, Finalizer, SourceMap, UrlRoot,
};
pub use config::{FinalizerConfig, WritePolicy};
