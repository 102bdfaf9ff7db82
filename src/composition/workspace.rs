use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;

/// Explicit per-run context: the project folder layout and the temp-file
/// naming discipline shared by every pipeline stage.
///
/// Intermediates live under `temp/`, named uniquely per segment index and
/// image index so stages never reuse a name. The workspace removes the whole
/// temp tree on cleanup, and again on drop as a last resort.
#[derive(Debug)]
pub struct Workspace {
    base: PathBuf,
    output_dir: PathBuf,
    temp_dir: PathBuf,
}

impl Workspace {
    /// Prepare the workspace under `base`, creating `output/` and `temp/`.
    pub fn prepare(base: &Path) -> Result<Self> {
        let output_dir = base.join("output");
        let temp_dir = base.join("temp");
        std::fs::create_dir_all(&output_dir)?;
        std::fs::create_dir_all(&temp_dir)?;

        Ok(Self {
            base: base.to_path_buf(),
            output_dir,
            temp_dir,
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// A uniquely named file under `temp/`.
    pub fn temp_file(&self, name: &str) -> PathBuf {
        self.temp_dir.join(name)
    }

    /// The single output artifact of a run.
    pub fn final_output(&self) -> PathBuf {
        self.output_dir.join("final_video.mp4")
    }

    pub fn template_image(&self) -> PathBuf {
        self.base.join("template.png")
    }

    pub fn anchor_video(&self) -> PathBuf {
        self.base.join("anchor.mp4")
    }

    pub fn record_video(&self) -> PathBuf {
        self.base.join("record.mp4")
    }

    /// The optional transition clip. `transition.mp4` is preferred; the
    /// legacy `transaction.mp4` name is accepted as a fallback.
    pub fn transition_video(&self) -> Option<PathBuf> {
        let preferred = self.base.join("transition.mp4");
        if preferred.exists() {
            return Some(preferred);
        }
        let legacy = self.base.join("transaction.mp4");
        legacy.exists().then_some(legacy)
    }

    /// Remove a consumed intermediate, tolerating files already gone.
    pub fn discard(&self, path: &Path) {
        if let Err(e) = std::fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove intermediate {:?}: {}", path, e);
            }
        }
    }

    /// Best-effort removal of every remaining intermediate.
    pub fn cleanup(&self) {
        if let Err(e) = std::fs::remove_dir_all(&self.temp_dir) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove temp directory {:?}: {}", self.temp_dir, e);
            }
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_prepare_creates_output_and_temp() {
        let dir = tempdir().unwrap();
        let ws = Workspace::prepare(dir.path()).unwrap();

        assert!(dir.path().join("output").is_dir());
        assert!(dir.path().join("temp").is_dir());
        assert!(ws.final_output().ends_with("output/final_video.mp4"));
    }

    #[test]
    fn test_cleanup_removes_temp_tree() {
        let dir = tempdir().unwrap();
        let ws = Workspace::prepare(dir.path()).unwrap();
        std::fs::write(ws.temp_file("segment_01.mp4"), b"x").unwrap();

        ws.cleanup();
        assert!(!dir.path().join("temp").exists());
        assert!(dir.path().join("output").exists());
    }

    #[test]
    fn test_transition_fallback_name() {
        let dir = tempdir().unwrap();
        let ws = Workspace::prepare(dir.path()).unwrap();
        assert!(ws.transition_video().is_none());

        std::fs::write(dir.path().join("transaction.mp4"), b"x").unwrap();
        assert!(ws.transition_video().unwrap().ends_with("transaction.mp4"));

        std::fs::write(dir.path().join("transition.mp4"), b"x").unwrap();
        assert!(ws.transition_video().unwrap().ends_with("transition.mp4"));
    }

    #[test]
    fn test_discard_tolerates_missing_file() {
        let dir = tempdir().unwrap();
        let ws = Workspace::prepare(dir.path()).unwrap();
        ws.discard(&ws.temp_file("never_created.mp4"));
    }
}
