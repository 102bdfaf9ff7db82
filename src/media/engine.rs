use std::path::Path;
use std::process::{Command, Stdio};

use tokio::task;
use tracing::debug;

use crate::error::{MediaError, Result};

/// External transcoding engine, invoked as `ffmpeg`/`ffprobe` processes.
///
/// Every invocation is a blocking call run on the blocking thread pool; the
/// engine holds no per-run state, so one instance serves the whole pipeline.
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    ffmpeg: String,
    ffprobe: String,
}

impl FfmpegEngine {
    pub fn new() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }

    /// Override the binary names, e.g. for a vendored ffmpeg build.
    pub fn with_binaries<S: Into<String>>(ffmpeg: S, ffprobe: S) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Quick availability probe for startup diagnostics.
    pub fn check_available(&self) -> bool {
        Command::new(&self.ffmpeg)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Run one transcode job built by [`crate::media::jobs`].
    pub async fn run(&self, args: Vec<String>) -> Result<()> {
        debug!("{} {}", self.ffmpeg, args.join(" "));

        let tool = self.ffmpeg.clone();
        let output = task::spawn_blocking(move || Command::new(&tool).args(&args).output())
            .await
            .map_err(|e| MediaError::ToolFailed {
                tool: self.ffmpeg.clone(),
                status: "join error".to_string(),
                stderr: e.to_string(),
            })?
            .map_err(|e| MediaError::Launch {
                tool: self.ffmpeg.clone(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(MediaError::ToolFailed {
                tool: self.ffmpeg.clone(),
                status: output.status.to_string(),
                stderr,
            }
            .into());
        }

        Ok(())
    }

    /// Measured duration of any media file, in seconds.
    pub async fn media_duration(&self, path: &Path) -> Result<f64> {
        let stdout = self
            .probe(vec![
                "-v".into(),
                "error".into(),
                "-show_entries".into(),
                "format=duration".into(),
                "-of".into(),
                "default=noprint_wrappers=1:nokey=1".into(),
                path.display().to_string(),
            ])
            .await?;

        stdout.trim().parse::<f64>().map_err(|e| {
            MediaError::ProbeParse {
                tool: self.ffprobe.clone(),
                path: path.to_path_buf(),
                reason: format!("duration '{}': {}", stdout.trim(), e),
            }
            .into()
        })
    }

    /// Resolution of the first video stream.
    pub async fn video_resolution(&self, path: &Path) -> Result<(u32, u32)> {
        let stdout = self
            .probe(vec![
                "-v".into(),
                "error".into(),
                "-select_streams".into(),
                "v:0".into(),
                "-show_entries".into(),
                "stream=width,height".into(),
                "-of".into(),
                "csv=p=0".into(),
                path.display().to_string(),
            ])
            .await?;

        parse_resolution(&stdout).ok_or_else(|| {
            MediaError::ProbeParse {
                tool: self.ffprobe.clone(),
                path: path.to_path_buf(),
                reason: format!("resolution '{}'", stdout.trim()),
            }
            .into()
        })
    }

    async fn probe(&self, args: Vec<String>) -> Result<String> {
        debug!("{} {}", self.ffprobe, args.join(" "));

        let tool = self.ffprobe.clone();
        let output = task::spawn_blocking(move || Command::new(&tool).args(&args).output())
            .await
            .map_err(|e| MediaError::ToolFailed {
                tool: self.ffprobe.clone(),
                status: "join error".to_string(),
                stderr: e.to_string(),
            })?
            .map_err(|e| MediaError::Launch {
                tool: self.ffprobe.clone(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(MediaError::ToolFailed {
                tool: self.ffprobe.clone(),
                status: output.status.to_string(),
                stderr,
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_resolution(stdout: &str) -> Option<(u32, u32)> {
    let mut parts = stdout.trim().split(',');
    let width = parts.next()?.trim().parse().ok()?;
    let height = parts.next()?.trim().parse().ok()?;
    Some((width, height))
}
