//! Structured events emitted while persisting artifacts.
//!
//! The finalizer never formats log lines; it reports what happened to an
//! [`EventSink`]. [`LogSink`] renders events through the crate logger.

use std::path::PathBuf;

use crate::{debug, log};

/// Kind of persisted artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Uncompressed copy of the original source.
    Uncompressed,
    /// Source map.
    SourceMap,
}

impl ArtifactKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uncompressed => "source",
            Self::SourceMap => "sourcemap",
        }
    }
}

/// Something that happened on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactEvent {
    /// Primary artifact written.
    Written { kind: ArtifactKind, path: PathBuf },
    /// Primary artifact already present, left untouched.
    Skipped { kind: ArtifactKind, path: PathBuf },
    /// `.gz` sibling written.
    GzipWritten { kind: ArtifactKind, path: PathBuf },
    /// `.gz` sibling already present, left untouched.
    GzipSkipped { kind: ArtifactKind, path: PathBuf },
}

/// Receiver of finalizer events.
///
/// Must be shareable across threads: the host may finalize several assets
/// in parallel with one finalizer.
pub trait EventSink: Send + Sync {
    fn record(&self, event: ArtifactEvent);
}

/// Renders events via `log!` / `debug!`.
///
/// Only source map writes are logged at the default level; everything else
/// shows up with `--verbose`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&self, event: ArtifactEvent) {
        match &event {
            ArtifactEvent::Written { kind, path } if *kind == ArtifactKind::SourceMap => {
                log!("assets"; "writing {}", path.display());
            }
            ArtifactEvent::GzipWritten { kind, path } if *kind == ArtifactKind::SourceMap => {
                log!("gzip"; "writing {}", path.display());
            }
            ArtifactEvent::Written { kind, path } => {
                debug!("assets"; "writing {} {}", kind.as_str(), path.display());
            }
            ArtifactEvent::GzipWritten { kind, path } => {
                debug!("gzip"; "writing {} {}", kind.as_str(), path.display());
            }
            ArtifactEvent::Skipped { kind, path } | ArtifactEvent::GzipSkipped { kind, path } => {
                debug!("assets"; "unchanged {} {}", kind.as_str(), path.display());
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: ArtifactEvent) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use parking_lot::Mutex;

    /// Collects events for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        events: Mutex<Vec<ArtifactEvent>>,
    }

    impl RecordingSink {
        pub fn events(&self) -> Vec<ArtifactEvent> {
            self.events.lock().clone()
        }
    }

    impl EventSink for RecordingSink {
        fn record(&self, event: ArtifactEvent) {
            self.events.lock().push(event);
        }
    }
}
