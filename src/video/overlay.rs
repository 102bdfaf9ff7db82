use std::path::PathBuf;

use tracing::{debug, info};

use crate::composition::workspace::Workspace;
use crate::config::Config;
use crate::error::{AssemblyError, Result};
use crate::media::{filters, jobs, FfmpegEngine};

/// Prepare the presenter (record) clip for overlaying: scale it to frame
/// size, key out its backdrop, and loop it to cover `span` seconds.
///
/// The result is an alpha-carrying `.mov` truncated to exactly `span`, ready
/// for the final composite.
pub async fn prepare_presenter_clip(
    media: &FfmpegEngine,
    config: &Config,
    workspace: &Workspace,
    span: f64,
) -> Result<PathBuf> {
    let record = workspace.record_video();

    info!("Processing presenter clip (chroma key + loop)...");

    let (src_width, src_height) = media.video_resolution(&record).await?;
    let record_duration = media.media_duration(&record).await?;
    if record_duration <= 0.0 {
        return Err(AssemblyError::generic(format!(
            "Presenter clip {:?} has no measurable duration",
            record
        )));
    }

    // Two spare loops absorb truncation rounding at the tail
    let loops = (span / record_duration) as u32 + 2;
    debug!(
        "Presenter source {}x{}, {:.2}s; looping {} times for {:.1}s",
        src_width, src_height, record_duration, loops, span
    );

    let scale = filters::record_scale(
        src_width,
        src_height,
        config.video.width,
        config.video.height,
    );
    let filter = filters::record_prep(&scale, &config.overlay);

    let output = workspace.temp_file("presenter_overlay.mov");
    media
        .run(jobs::record_loop(
            &record,
            &filter,
            loops,
            span,
            config.video.fps,
            &output,
        ))
        .await?;

    info!("Presenter clip ready");
    Ok(output)
}
