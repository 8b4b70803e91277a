//! The compression hook: minify, persist the source map, link it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::artifact::ArtifactStore;
use super::error::{MapOrigin, Result};
use super::events::{ArtifactKind, EventSink, LogSink};
use super::minify::{Minify, OxcMinifier};
use super::sourcemap::{self, SourceMap};
use crate::config::FinalizerConfig;

/// One asset handed over by the host pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionRequest {
    /// JavaScript text (raw source or a pre-built bundle).
    pub source_text: String,
    /// Logical asset name, e.g. `application` or `admin/dashboard`.
    pub logical_name: String,
    /// Original file on disk; bundles look for `<path>.map` next to it.
    pub source_file_path: PathBuf,
}

impl CompressionRequest {
    pub fn new(
        source_text: impl Into<String>,
        logical_name: impl Into<String>,
        source_file_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            logical_name: logical_name.into(),
            source_file_path: source_file_path.into(),
        }
    }
}

/// Result of [`Finalizer::compress`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedOutput {
    /// Minified JavaScript ending with the `sourceMappingURL` comment.
    pub data: String,
    /// The map as persisted.
    pub map: SourceMap,
}

impl CompressedOutput {
    /// Legacy contract: just the final text.
    pub fn into_data(self) -> String {
        self.data
    }
}

/// Finalizes JavaScript assets.
///
/// Holds no mutable state; one finalizer can serve parallel compressions of
/// different assets.
pub struct Finalizer {
    config: FinalizerConfig,
    minifier: Box<dyn Minify>,
    store: ArtifactStore,
}

impl Finalizer {
    /// Finalizer with the oxc minifier and log output.
    pub fn new(config: FinalizerConfig) -> Self {
        let minifier = OxcMinifier::new(config.assets.terser.clone());
        Self::with_parts(config, Box::new(minifier), Arc::new(LogSink))
    }

    /// Finalizer with an explicit minifier and event sink.
    pub fn with_parts(
        config: FinalizerConfig,
        minifier: Box<dyn Minify>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let store = ArtifactStore::new(&config, sink);
        Self {
            config,
            minifier,
            store,
        }
    }

    pub fn config(&self) -> &FinalizerConfig {
        &self.config
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Whether `logical_name` names a pre-built bundle.
    pub fn is_bundle(&self, logical_name: &str) -> bool {
        logical_name.contains(&self.config.assets.bundle_marker)
    }

    /// Finalize one asset.
    ///
    /// Raw source is minified and gets a fresh map whose `file` is
    /// `<logical_name>.js` and whose source is either embedded or persisted
    /// as an uncompressed artifact. Bundles reuse their sidecar map as-is.
    /// Either way the map is persisted and referenced from the output.
    pub fn compress(&self, request: &CompressionRequest) -> Result<CompressedOutput> {
        let (code, map) = if self.is_bundle(&request.logical_name) {
            self.prepare_bundle(request)?
        } else {
            self.prepare_source(request)?
        };

        let assets = &self.config.assets;
        let map_json = map.to_json();
        let persisted = self.store.persist(
            &request.logical_name,
            map_json.as_bytes(),
            &assets.sourcemaps_prefix,
            "js.map",
            ArtifactKind::SourceMap,
        )?;

        Ok(CompressedOutput {
            data: sourcemap::append_mapping_comment(code, &persisted.url),
            map,
        })
    }

    /// Finalize one asset, returning only the text.
    pub fn compress_legacy(&self, request: &CompressionRequest) -> Result<String> {
        self.compress(request).map(CompressedOutput::into_data)
    }

    fn prepare_bundle(&self, request: &CompressionRequest) -> Result<(String, SourceMap)> {
        let map = sourcemap::load_sidecar(&request.source_file_path)?;
        let code = sourcemap::strip_mapping_comment(&request.source_text);
        Ok((code, map))
    }

    fn prepare_source(&self, request: &CompressionRequest) -> Result<(String, SourceMap)> {
        let assets = &self.config.assets;
        let minified = self
            .minifier
            .compile_with_map(&request.source_text, &request.source_file_path)?;
        let mut map = SourceMap::parse(&minified.map_json, MapOrigin::Minifier)?;

        if assets.sourcemaps_embed_source {
            map.embed_source(&request.source_text);
        } else {
            let uncompressed = self.store.persist(
                &request.logical_name,
                request.source_text.as_bytes(),
                &assets.uncompressed_prefix,
                "js",
                ArtifactKind::Uncompressed,
            )?;
            map.set_single_source(uncompressed.url);
        }

        map.file = Some(format!("{}.js", request.logical_name));
        Ok((minified.code, map))
    }
}

/// Logical name for a file when the host does not supply one: the file name
/// without its `.js` extension.
pub fn default_logical_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.strip_suffix(".js").map(str::to_owned).unwrap_or(name)
}
