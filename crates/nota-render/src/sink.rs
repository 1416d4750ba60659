//! # Artifact Delivery
//!
//! The renderer produces bytes; the embedding environment decides what a
//! "download" means. A browser shell streams to the user, a desktop shell
//! writes a file, tests keep everything in memory. [`ArtifactSink`] is
//! that seam.

use std::fs;
use std::io;
use std::path::PathBuf;

/// Caller-supplied side channel receiving finished artifacts.
pub trait ArtifactSink {
    /// Delivers one named artifact. Implementations own durability;
    /// the renderer only hands bytes over.
    fn deliver(&mut self, name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Writes artifacts into a directory, one file per delivery.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileSink { dir: dir.into() }
    }
}

impl ArtifactSink for FileSink {
    fn deliver(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(name), bytes)
    }
}

/// Collects artifacts in memory. The default choice in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivered artifacts in arrival order.
    pub fn artifacts(&self) -> &[(String, Vec<u8>)] {
        &self.artifacts
    }
}

impl ArtifactSink for MemorySink {
    fn deliver(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        self.artifacts.push((name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_collects_in_order() {
        let mut sink = MemorySink::new();
        sink.deliver("a.pdf", b"first").unwrap();
        sink.deliver("b.pdf", b"second").unwrap();

        let artifacts = sink.artifacts();
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].0, "a.pdf");
        assert_eq!(artifacts[1].1, b"second");
    }

    #[test]
    fn test_file_sink_writes() {
        let dir = std::env::temp_dir().join("nota-render-sink-test");
        let mut sink = FileSink::new(&dir);
        sink.deliver("receipt.pdf", b"%PDF-").unwrap();

        let written = fs::read(dir.join("receipt.pdf")).unwrap();
        assert_eq!(written, b"%PDF-");
        let _ = fs::remove_dir_all(&dir);
    }
}
