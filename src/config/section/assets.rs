//! `[assets]` section configuration.
//!
//! Controls where fingerprinted artifacts land, how their URLs are built
//! and whether gzip siblings are written.
//!
//! # Example
//!
//! ```toml
//! [assets]
//! prefix = "/assets"
//! gzip = true
//! uncompressed_prefix = "sources"
//! sourcemaps_prefix = "maps"
//! sourcemaps_embed_source = false
//! sourcemaps_url_root = "https://cdn.example.com"   # or false
//! sourcemaps_gzip = false                            # unset: follow `gzip`
//! bundle_marker = "-bundle"
//! write_policy = "skip-existing"                     # or "overwrite"
//! ```

use serde::Deserialize;

use super::TerserConfig;
use crate::asset::UrlRoot;
use crate::config::{ConfigDiagnostics, FieldPath};

/// What to do when an artifact's content-addressed path already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WritePolicy {
    /// Leave existing files untouched (same name, same bytes).
    #[default]
    SkipExisting,
    /// Always rewrite.
    Overwrite,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// URL path prefix shared by all assets.
    pub prefix: String,
    /// Global gzip switch.
    pub gzip: bool,
    /// Sub-prefix for uncompressed sources.
    pub uncompressed_prefix: String,
    /// Sub-prefix for source maps.
    pub sourcemaps_prefix: String,
    /// Embed the original source in `sourcesContent` instead of writing it out.
    pub sourcemaps_embed_source: bool,
    /// URL root for artifact URLs.
    pub sourcemaps_url_root: UrlRoot,
    /// Gzip override for finalizer artifacts.
    pub sourcemaps_gzip: Option<bool>,
    /// Substring marking pre-built bundles that carry a sidecar map.
    pub bundle_marker: String,
    pub write_policy: WritePolicy,
    /// Minifier options.
    pub terser: TerserConfig,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            prefix: "/assets".into(),
            gzip: true,
            uncompressed_prefix: "sources".into(),
            sourcemaps_prefix: "maps".into(),
            sourcemaps_embed_source: false,
            sourcemaps_url_root: UrlRoot::Identity,
            sourcemaps_gzip: None,
            bundle_marker: "-bundle".into(),
            write_policy: WritePolicy::SkipExisting,
            terser: TerserConfig::default(),
        }
    }
}

/// Field paths of [`AssetsConfig`] for diagnostics.
pub struct AssetsConfigFields {
    pub prefix: FieldPath,
    pub uncompressed_prefix: FieldPath,
    pub sourcemaps_prefix: FieldPath,
    pub sourcemaps_embed_source: FieldPath,
    pub sourcemaps_url_root: FieldPath,
    pub bundle_marker: FieldPath,
}

impl AssetsConfig {
    pub const FIELDS: AssetsConfigFields = AssetsConfigFields {
        prefix: FieldPath::new("assets.prefix"),
        uncompressed_prefix: FieldPath::new("assets.uncompressed_prefix"),
        sourcemaps_prefix: FieldPath::new("assets.sourcemaps_prefix"),
        sourcemaps_embed_source: FieldPath::new("assets.sourcemaps_embed_source"),
        sourcemaps_url_root: FieldPath::new("assets.sourcemaps_url_root"),
        bundle_marker: FieldPath::new("assets.bundle_marker"),
    };

    /// Whether finalizer artifacts get `.gz` siblings.
    ///
    /// `sourcemaps_gzip` wins when set; otherwise the global `gzip` applies.
    pub fn gzip_artifacts(&self) -> bool {
        self.sourcemaps_gzip.unwrap_or(self.gzip)
    }

    /// Validate the section.
    ///
    /// # Checks
    /// - prefixes must not contain `..` segments
    /// - `bundle_marker` must not be empty
    /// - a fixed URL root must not be empty and, when it has a scheme, must parse
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let prefixes = [
            (Self::FIELDS.prefix, &self.prefix),
            (Self::FIELDS.uncompressed_prefix, &self.uncompressed_prefix),
            (Self::FIELDS.sourcemaps_prefix, &self.sourcemaps_prefix),
        ];
        for (field, value) in prefixes {
            if value.split('/').any(|segment| segment == "..") {
                diag.error(
                    field,
                    format!("{field} must not leave the public directory: `{value}`"),
                );
            }
        }

        if self.bundle_marker.is_empty() {
            diag.error_with_hint(
                Self::FIELDS.bundle_marker,
                format!("{} must not be empty", Self::FIELDS.bundle_marker),
                "an empty marker would treat every asset as a bundle",
            );
        }

        if let UrlRoot::FixedRoot(root) = &self.sourcemaps_url_root {
            let field = Self::FIELDS.sourcemaps_url_root;
            if root.trim().is_empty() {
                diag.error_with_hint(
                    field,
                    format!("{field} is an empty string"),
                    "use `false` to keep artifact paths as URLs",
                );
            } else if root.contains("://") && url::Url::parse(root).is_err() {
                diag.error(field, format!("{field} is not a valid URL: `{root}`"));
            }
        }

        if self.sourcemaps_embed_source && self.uncompressed_prefix != "sources" {
            diag.warn(
                Self::FIELDS.uncompressed_prefix,
                format!(
                    "unused while {} is true",
                    Self::FIELDS.sourcemaps_embed_source.as_str()
                ),
            );
        }
    }
}
