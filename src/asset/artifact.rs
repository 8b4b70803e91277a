//! Content-addressed artifact persistence.
//!
//! Every artifact lands at
//! `<public_dir>/<assets.prefix>/<prefix>/<logical_name>-<digest>.<extension>`:
//!
//! ```text
//! public/
//! └── assets/
//!     ├── sources/application-3f9a….js        (uncompressed original)
//!     ├── sources/application-3f9a….js.gz
//!     ├── maps/application-81c0….js.map
//!     └── maps/application-81c0….js.map.gz
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::digest::ContentHash;
use super::error::{FinalizeError, Result};
use super::events::{ArtifactEvent, ArtifactKind, EventSink};
use super::gzip;
use super::resolve::{UrlRoot, join_segments};
use crate::config::{FinalizerConfig, WritePolicy};

/// An artifact that has been written (or was already present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedArtifact {
    /// Logical filename, e.g. `/assets/maps/app-<hash>.js.map`.
    pub filename: String,
    /// Location on disk.
    pub path: PathBuf,
    /// Resolved URL.
    pub url: String,
    pub hash: ContentHash,
}

/// Writes artifacts under the public directory.
#[derive(Clone)]
pub struct ArtifactStore {
    public_dir: PathBuf,
    assets_prefix: String,
    policy: WritePolicy,
    gzip: bool,
    url_root: UrlRoot,
    sink: Arc<dyn EventSink>,
}

impl ArtifactStore {
    pub fn new(config: &FinalizerConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            public_dir: config.public_dir.clone(),
            assets_prefix: config.assets.prefix.clone(),
            policy: config.assets.write_policy,
            gzip: config.assets.gzip_artifacts(),
            url_root: config.assets.sourcemaps_url_root.clone(),
            sink,
        }
    }

    /// Logical filename for `content`.
    pub fn filename_for(
        &self,
        logical_name: &str,
        hash: ContentHash,
        prefix: &str,
        extension: &str,
    ) -> String {
        let basename = format!("{logical_name}-{hash}.{extension}");
        join_segments(&[&self.assets_prefix, prefix, &basename])
    }

    /// Disk location of a logical filename.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.public_dir.join(filename.trim_start_matches('/'))
    }

    /// Resolve the URL of a logical filename.
    pub fn url_for(&self, filename: &str) -> String {
        self.url_root.resolve(filename)
    }

    /// Persist `content` under its content-addressed name and return where
    /// it went.
    ///
    /// Identical content always yields the identical path and URL. Existing
    /// files are left alone under [`WritePolicy::SkipExisting`]; the `.gz`
    /// sibling follows the same policy independently.
    pub fn persist(
        &self,
        logical_name: &str,
        content: &[u8],
        prefix: &str,
        extension: &str,
        kind: ArtifactKind,
    ) -> Result<PersistedArtifact> {
        let hash = ContentHash::of(content);
        let filename = self.filename_for(logical_name, hash, prefix, extension);
        let path = self.path_for(&filename);

        if self.should_write(&path) {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| FinalizeError::io(parent, e))?;
            }
            fs::write(&path, content).map_err(|e| FinalizeError::io(&path, e))?;
            self.sink.record(ArtifactEvent::Written {
                kind,
                path: path.clone(),
            });
        } else {
            self.sink.record(ArtifactEvent::Skipped {
                kind,
                path: path.clone(),
            });
        }

        if self.gzip {
            self.persist_gzip(&path, kind)?;
        }

        let url = self.url_for(&filename);
        Ok(PersistedArtifact {
            filename,
            path,
            url,
            hash,
        })
    }

    fn persist_gzip(&self, path: &Path, kind: ArtifactKind) -> Result<()> {
        let target = gzip::sibling_path(path);
        if self.should_write(&target) {
            let target = gzip::write_sibling(path)?;
            self.sink.record(ArtifactEvent::GzipWritten { kind, path: target });
        } else {
            self.sink.record(ArtifactEvent::GzipSkipped { kind, path: target });
        }
        Ok(())
    }

    fn should_write(&self, path: &Path) -> bool {
        match self.policy {
            WritePolicy::Overwrite => true,
            WritePolicy::SkipExisting => !path.exists(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::events::testing::RecordingSink;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    fn store(
        dir: &Path,
        edit: impl FnOnce(&mut FinalizerConfig),
    ) -> (ArtifactStore, Arc<RecordingSink>) {
        let mut config = FinalizerConfig::default();
        config.public_dir = dir.to_path_buf();
        edit(&mut config);
        let sink = Arc::new(RecordingSink::default());
        (ArtifactStore::new(&config, sink.clone()), sink)
    }

    #[test]
    fn test_persist_layout() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store(dir.path(), |_| {});

        let artifact = store
            .persist("application", b"{}", "maps", "js.map", ArtifactKind::SourceMap)
            .unwrap();

        let hash = ContentHash::of(b"{}");
        let expected = format!("/assets/maps/application-{hash}.js.map");
        assert_eq!(artifact.filename, expected);
        assert_eq!(artifact.url, expected);
        assert_eq!(
            artifact.path,
            dir.path().join(format!("assets/maps/application-{hash}.js.map"))
        );
        assert_eq!(fs::read(&artifact.path).unwrap(), b"{}");
    }

    #[test]
    fn test_identical_content_same_url() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store(dir.path(), |_| {});

        let first = store
            .persist("app", b"var a=1;", "sources", "js", ArtifactKind::Uncompressed)
            .unwrap();
        let second = store
            .persist("app", b"var a=1;", "sources", "js", ArtifactKind::Uncompressed)
            .unwrap();
        assert_eq!(first.url, second.url);

        let changed = store
            .persist("app", b"var a=2;", "sources", "js", ArtifactKind::Uncompressed)
            .unwrap();
        assert_ne!(first.url, changed.url);
        assert_ne!(first.path, changed.path);
    }

    #[test]
    fn test_nested_logical_name_creates_dirs() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store(dir.path(), |_| {});

        let artifact = store
            .persist("admin/dashboard", b"x", "sources", "js", ArtifactKind::Uncompressed)
            .unwrap();
        assert!(artifact.path.starts_with(dir.path().join("assets/sources/admin")));
        assert!(artifact.path.exists());
    }

    #[test]
    fn test_skip_existing_policy() {
        let dir = TempDir::new().unwrap();
        let (store, sink) = store(dir.path(), |c| c.assets.gzip = false);

        let first = store
            .persist("app", b"{}", "maps", "js.map", ArtifactKind::SourceMap)
            .unwrap();
        // Tamper with the file: a skip must leave it as-is.
        fs::write(&first.path, "tampered").unwrap();
        store
            .persist("app", b"{}", "maps", "js.map", ArtifactKind::SourceMap)
            .unwrap();

        assert_eq!(fs::read_to_string(&first.path).unwrap(), "tampered");
        let events = sink.events();
        assert!(matches!(events[0], ArtifactEvent::Written { .. }));
        assert!(matches!(events[1], ArtifactEvent::Skipped { .. }));
    }

    #[test]
    fn test_overwrite_policy() {
        let dir = TempDir::new().unwrap();
        let (store, sink) = store(dir.path(), |c| {
            c.assets.gzip = false;
            c.assets.write_policy = WritePolicy::Overwrite;
        });

        let first = store
            .persist("app", b"{}", "maps", "js.map", ArtifactKind::SourceMap)
            .unwrap();
        fs::write(&first.path, "tampered").unwrap();
        store
            .persist("app", b"{}", "maps", "js.map", ArtifactKind::SourceMap)
            .unwrap();

        assert_eq!(fs::read_to_string(&first.path).unwrap(), "{}");
        assert!(
            sink.events()
                .iter()
                .all(|e| matches!(e, ArtifactEvent::Written { .. }))
        );
    }

    #[test]
    fn test_gzip_sibling() {
        let dir = TempDir::new().unwrap();
        let (store, sink) = store(dir.path(), |c| c.assets.gzip = true);

        let artifact = store
            .persist("app", b"var a=1;", "sources", "js", ArtifactKind::Uncompressed)
            .unwrap();
        let gz = gzip::sibling_path(&artifact.path);

        let mut out = Vec::new();
        GzDecoder::new(fs::File::open(&gz).unwrap())
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, b"var a=1;");
        assert!(
            sink.events()
                .contains(&ArtifactEvent::GzipWritten {
                    kind: ArtifactKind::Uncompressed,
                    path: gz,
                })
        );
    }

    #[test]
    fn test_skip_existing_leaves_gzip_untouched() {
        let dir = TempDir::new().unwrap();
        let (store, sink) = store(dir.path(), |c| c.assets.gzip = true);

        let first = store
            .persist("app", b"{}", "maps", "js.map", ArtifactKind::SourceMap)
            .unwrap();
        let gz = gzip::sibling_path(&first.path);
        fs::write(&gz, "tampered").unwrap();
        store
            .persist("app", b"{}", "maps", "js.map", ArtifactKind::SourceMap)
            .unwrap();

        assert_eq!(fs::read_to_string(&gz).unwrap(), "tampered");
        let events = sink.events();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[1], ArtifactEvent::GzipWritten { .. }));
        assert!(matches!(events[2], ArtifactEvent::Skipped { .. }));
        assert_eq!(
            events[3],
            ArtifactEvent::GzipSkipped {
                kind: ArtifactKind::SourceMap,
                path: gz,
            }
        );
    }

    #[test]
    fn test_sourcemaps_gzip_overrides_global() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store(dir.path(), |c| {
            c.assets.gzip = true;
            c.assets.sourcemaps_gzip = Some(false);
        });

        let artifact = store
            .persist("app", b"{}", "maps", "js.map", ArtifactKind::SourceMap)
            .unwrap();
        assert!(!gzip::sibling_path(&artifact.path).exists());
    }

    #[test]
    fn test_missing_gzip_written_for_existing_primary() {
        let dir = TempDir::new().unwrap();
        let (plain, _) = store(dir.path(), |c| c.assets.gzip = false);
        let artifact = plain
            .persist("app", b"{}", "maps", "js.map", ArtifactKind::SourceMap)
            .unwrap();

        let (zipped, sink) = store(dir.path(), |c| c.assets.gzip = true);
        zipped
            .persist("app", b"{}", "maps", "js.map", ArtifactKind::SourceMap)
            .unwrap();

        assert!(gzip::sibling_path(&artifact.path).exists());
        let events = sink.events();
        assert!(matches!(events[0], ArtifactEvent::Skipped { .. }));
        assert!(matches!(events[1], ArtifactEvent::GzipWritten { .. }));
    }

    #[test]
    fn test_fixed_root_url() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store(dir.path(), |c| {
            c.assets.sourcemaps_url_root = UrlRoot::FixedRoot("https://cdn.example.com".into());
        });

        let artifact = store
            .persist("app", b"{}", "maps", "js.map", ArtifactKind::SourceMap)
            .unwrap();
        assert_eq!(
            artifact.url,
            format!("https://cdn.example.com{}", artifact.filename)
        );
    }
}
