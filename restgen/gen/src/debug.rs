//! Debug side channel for emitted units.
//!
//! A [`DebugSink`] receives every unit after generation. Sinks are
//! best-effort: they log their own failures and never return them, so a
//! broken sink cannot change what the generator writes.

use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::codegen::GeneratedUnit;

/// Receives a copy of every emitted unit.
pub trait DebugSink: Send + Sync {
    /// Offers a unit. Must not block and must not fail.
    fn offer(&self, unit: &GeneratedUnit);
}

/// Writes each unit to `{dir}/{hint}.rs`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DebugSink for DirectorySink {
    fn offer(&self, unit: &GeneratedUnit) {
        let path = self.dir.join(unit.file_name());
        let result = fs::create_dir_all(&self.dir).and_then(|()| fs::write(&path, &unit.code));
        match result {
            Ok(()) => debug!(path = %path.display(), "dumped unit"),
            Err(error) => warn!(path = %path.display(), %error, "debug dump failed"),
        }
    }
}

/// Forwards units to a bounded channel without waiting for capacity.
///
/// Units that do not fit are dropped with a warning.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<GeneratedUnit>,
}

impl ChannelSink {
    /// Creates a sink and the receiver that drains it.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<GeneratedUnit>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl DebugSink for ChannelSink {
    fn offer(&self, unit: &GeneratedUnit) {
        match self.sender.try_send(unit.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(unit)) => {
                warn!(hint = %unit.hint, "debug channel full, unit dropped");
            }
            Err(TrySendError::Closed(unit)) => {
                warn!(hint = %unit.hint, "debug channel closed, unit dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::QualifiedName;
    use crate::scanner::CandidateKind;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    fn unit(hint: &str) -> GeneratedUnit {
        GeneratedUnit {
            hint: hint.into(),
            kind: CandidateKind::Serializer,
            source: QualifiedName::new(vec![], "State"),
            code: "struct X;".into(),
        }
    }

    #[test]
    fn directory_sink_writes_units() {
        let temp_dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp_dir.path().join("dump"));

        sink.offer(&unit("State.serializer"));

        let written = fs::read_to_string(temp_dir.path().join("dump/State.serializer.rs")).unwrap();
        assert_eq!(written, "struct X;");
    }

    #[test]
    #[traced_test]
    fn directory_sink_logs_failures() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let sink = DirectorySink::new(blocker.join("dump"));

        sink.offer(&unit("State.serializer"));

        assert!(logs_contain("debug dump failed"));
    }

    #[test]
    #[traced_test]
    fn channel_sink_drops_when_full() {
        let (sink, mut receiver) = ChannelSink::new(1);

        sink.offer(&unit("a.serializer"));
        sink.offer(&unit("b.serializer"));

        assert_eq!(receiver.try_recv().unwrap().hint, "a.serializer");
        assert!(receiver.try_recv().is_err());
        assert!(logs_contain("debug channel full"));
    }

    #[test]
    #[traced_test]
    fn channel_sink_survives_closed_receiver() {
        let (sink, receiver) = ChannelSink::new(4);
        drop(receiver);

        sink.offer(&unit("a.serializer"));

        assert!(logs_contain("debug channel closed"));
    }
}
