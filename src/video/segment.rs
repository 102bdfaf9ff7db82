use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::composition::workspace::Workspace;
use crate::config::Config;
use crate::error::Result;
use crate::media::{filters, jobs, FfmpegEngine};
use crate::template::TemplateRegions;

/// A produced segment clip and its single authoritative duration.
///
/// The duration is probed once from the finished file and reused for the
/// timeline, the presenter-clip length, and the enable predicate, so those
/// can never disagree by a frame.
#[derive(Debug, Clone)]
pub struct BuiltSegment {
    pub index: usize,
    pub path: PathBuf,
    pub duration: f64,
}

/// Builds one duration-matched clip per (audio track, image folder) pair.
///
/// Intermediates are named per segment index and per image index; everything
/// strictly internal is deleted before returning, while the segment file
/// itself is owned by the caller.
pub struct SegmentBuilder<'a> {
    media: &'a FfmpegEngine,
    config: &'a Config,
    workspace: &'a Workspace,
}

impl<'a> SegmentBuilder<'a> {
    pub fn new(media: &'a FfmpegEngine, config: &'a Config, workspace: &'a Workspace) -> Self {
        Self {
            media,
            config,
            workspace,
        }
    }

    /// Flat mode: full-screen motion slideshow with the audio track muxed on.
    ///
    /// The images share the audio duration evenly; `-shortest` truncation
    /// makes the output duration equal the audio duration.
    pub async fn build_flat(
        &self,
        index: usize,
        audio: &Path,
        images: &[PathBuf],
    ) -> Result<BuiltSegment> {
        let audio_duration = self.media.media_duration(audio).await?;
        debug!(
            "Segment {}: {:.2}s of audio over {} images",
            index,
            audio_duration,
            images.len()
        );

        let slideshow = self
            .motion_slideshow(
                index,
                images,
                audio_duration,
                self.config.video.width,
                self.config.video.height,
            )
            .await?;

        let output = self.workspace.temp_file(&format!("segment_{index:02}.mp4"));
        self.media
            .run(jobs::mux_audio(
                &slideshow,
                audio,
                &self.config.encode,
                &output,
            ))
            .await?;
        self.workspace.discard(&slideshow);

        let duration = self.media.media_duration(&output).await?;
        Ok(BuiltSegment {
            index,
            path: output,
            duration,
        })
    }

    /// Template mode: slideshow sized to the main region, anchor footage
    /// looped into the anchor region, composited under the keyed template
    /// artwork, then the audio track muxed on.
    pub async fn build_template(
        &self,
        index: usize,
        audio: &Path,
        images: &[PathBuf],
        regions: &TemplateRegions,
    ) -> Result<BuiltSegment> {
        let audio_duration = self.media.media_duration(audio).await?;

        info!("     -> Creating slideshow for main screen...");
        let slideshow = self
            .motion_slideshow(
                index,
                images,
                audio_duration,
                regions.main.width,
                regions.main.height,
            )
            .await?;

        info!("     -> Processing anchor loop...");
        let anchor_loop = self
            .workspace
            .temp_file(&format!("anchor_loop_{index:02}.mp4"));
        let anchor_filter = filters::anchor_fill(
            regions.anchor.width,
            regions.anchor.height,
            self.config.video.fps,
        );
        self.media
            .run(jobs::loop_clip(
                &self.workspace.anchor_video(),
                &anchor_filter,
                audio_duration,
                &self.config.encode,
                &anchor_loop,
            ))
            .await?;

        info!("     -> Compositing with template...");
        let composed = self
            .workspace
            .temp_file(&format!("template_part_{index:02}.mp4"));
        let graph = filters::template_composite_graph(
            regions,
            self.config.video.width,
            self.config.video.height,
            audio_duration,
            self.config.video.fps,
            &self.config.overlay,
        );
        self.media
            .run(jobs::template_composite(
                &slideshow,
                &anchor_loop,
                &self.workspace.template_image(),
                &graph,
                audio_duration,
                &self.config.encode,
                &composed,
            ))
            .await?;

        info!("     -> Adding audio...");
        let output = self.workspace.temp_file(&format!("segment_{index:02}.mp4"));
        self.media
            .run(jobs::mux_audio(
                &composed,
                audio,
                &self.config.encode,
                &output,
            ))
            .await?;

        self.workspace.discard(&slideshow);
        self.workspace.discard(&anchor_loop);
        self.workspace.discard(&composed);

        let duration = self.media.media_duration(&output).await?;
        Ok(BuiltSegment {
            index,
            path: output,
            duration,
        })
    }

    /// Synthesize one motion clip per image and concatenate them in folder
    /// order. `images` must be non-empty; empty folders are skipped upstream.
    async fn motion_slideshow(
        &self,
        index: usize,
        images: &[PathBuf],
        total_duration: f64,
        width: u32,
        height: u32,
    ) -> Result<PathBuf> {
        let per_image = total_duration / images.len() as f64;
        let fps = self.config.video.fps;

        let mut clips = Vec::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            let clip = self
                .workspace
                .temp_file(&format!("img_{index:02}_{i:03}.mp4"));
            let filter = filters::motion_effect(per_image, width, height, fps);
            self.media
                .run(jobs::still_motion_clip(
                    image,
                    &filter,
                    per_image,
                    fps,
                    &self.config.encode,
                    &clip,
                ))
                .await?;
            clips.push(clip);
        }

        let output = self
            .workspace
            .temp_file(&format!("slideshow_{index:02}.mp4"));

        if clips.len() == 1 {
            // A one-clip slideshow needs no concat pass
            self.media.run(jobs::copy_remux(&clips[0], &output)).await?;
        } else {
            let list = self.workspace.temp_file(&format!("concat_{index:02}.txt"));
            write_concat_list(&list, &clips)?;
            self.media
                .run(jobs::concat_video(&list, &self.config.encode, &output))
                .await?;
            self.workspace.discard(&list);
        }

        for clip in &clips {
            self.workspace.discard(clip);
        }

        Ok(output)
    }
}

/// Write an ffmpeg concat-demuxer list, one absolute path per entry.
pub fn write_concat_list(list: &Path, clips: &[PathBuf]) -> Result<()> {
    let mut file = std::fs::File::create(list)?;
    for clip in clips {
        let absolute = clip
            .canonicalize()
            .unwrap_or_else(|_| clip.to_path_buf());
        writeln!(file, "file '{}'", absolute.display())?;
    }
    Ok(())
}
