use std::path::PathBuf;

use tracing::info;

use crate::composition::workspace::Workspace;
use crate::config::Config;
use crate::error::Result;
use crate::media::{filters, jobs, FfmpegEngine};

/// The transition clip after its one-shot re-encode to the canonical format
#[derive(Debug, Clone)]
pub struct NormalizedTransition {
    pub path: PathBuf,
    pub duration: f64,
}

/// Re-encode the project's transition clip (if any) to the canonical
/// resolution, frame rate and codec, letterboxed when the aspect differs.
///
/// A missing transition clip is not an error; the engine simply assembles
/// segments back to back.
pub async fn normalize(
    media: &FfmpegEngine,
    config: &Config,
    workspace: &Workspace,
) -> Result<Option<NormalizedTransition>> {
    let Some(source) = workspace.transition_video() else {
        info!("No transition clip found - skipping transitions");
        return Ok(None);
    };

    info!("Preparing transition...");
    let output = workspace.temp_file("normalized_transition.mp4");
    let filter = filters::transition_normalize(
        config.video.width,
        config.video.height,
        config.video.fps,
    );
    media
        .run(jobs::normalize_transition(
            &source,
            &filter,
            &config.encode,
            &output,
        ))
        .await?;

    let duration = media.media_duration(&output).await?;
    info!("Transition ready: {:.2}s", duration);

    Ok(Some(NormalizedTransition {
        path: output,
        duration,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_absent_transition_is_not_an_error() {
        let dir = tempdir().unwrap();
        let workspace = Workspace::prepare(dir.path()).unwrap();
        let media = FfmpegEngine::with_binaries("unused-ffmpeg", "unused-ffprobe");

        let result = normalize(&media, &Config::default(), &workspace)
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
