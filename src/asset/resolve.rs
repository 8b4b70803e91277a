//! Artifact filename joining and URL resolution.
//!
//! Artifact filenames are logical, slash-separated paths such as
//! `/assets/maps/application-<hash>.js.map`. The same filename is used to
//! locate the file under the public directory and, through [`UrlRoot`], to
//! compute the URL written into source maps and reference comments.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

/// Join logical path segments with single `/` separators.
///
/// Empty segments are skipped. A leading `/` on the first non-empty segment
/// is preserved; a trailing `/` on the last one is not.
///
/// ```ignore
/// join_segments(&["/assets/", "/maps", "app.js.map"]) // "/assets/maps/app.js.map"
/// join_segments(&["", "maps", "app.js.map"])          // "maps/app.js.map"
/// ```
pub fn join_segments(segments: &[&str]) -> String {
    let mut out = String::new();
    for segment in segments {
        let trimmed = segment.trim_matches('/');
        if trimmed.is_empty() {
            if out.is_empty() && segment.starts_with('/') {
                out.push('/');
            }
            continue;
        }
        if out.is_empty() {
            if segment.starts_with('/') {
                out.push('/');
            }
        } else if !out.ends_with('/') {
            out.push('/');
        }
        out.push_str(trimmed);
    }
    out
}

/// Callback turning an artifact filename into a URL.
pub type UrlCallback = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// How artifact filenames are turned into URLs.
///
/// In `finalizer.toml`, `sourcemaps_url_root = false` selects [`UrlRoot::Identity`]
/// and a string selects [`UrlRoot::FixedRoot`]. [`UrlRoot::Custom`] is only
/// available programmatically.
#[derive(Clone, Default)]
pub enum UrlRoot {
    /// Use the filename itself as the URL.
    #[default]
    Identity,
    /// Prepend a static root, e.g. `https://cdn.example.com`.
    FixedRoot(String),
    /// Delegate to a host-supplied callback.
    Custom(UrlCallback),
}

impl UrlRoot {
    /// Build a [`UrlRoot::Custom`] from a closure.
    pub fn custom(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Resolve the URL of an artifact filename.
    pub fn resolve(&self, filename: &str) -> String {
        match self {
            Self::Identity => filename.to_owned(),
            Self::FixedRoot(root) => {
                let root = root.trim_end_matches('/');
                let path = filename.trim_start_matches('/');
                format!("{root}/{path}")
            }
            Self::Custom(f) => f(filename),
        }
    }
}

impl fmt::Debug for UrlRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => f.write_str("Identity"),
            Self::FixedRoot(root) => f.debug_tuple("FixedRoot").field(root).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for UrlRoot {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Identity, Self::Identity) => true,
            (Self::FixedRoot(a), Self::FixedRoot(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<'de> Deserialize<'de> for UrlRoot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Root(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(false) => Ok(Self::Identity),
            Raw::Flag(true) => Err(serde::de::Error::custom(
                "expected `false` or a URL root string, found `true`",
            )),
            Raw::Root(root) => Ok(Self::FixedRoot(root)),
        }
    }
}
