use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, warn};

use crate::{
    assets::{self, AssetPair},
    composition::{timeline::Timeline, workspace::Workspace},
    config::Config,
    error::{AssetError, Result},
    media::{filters, jobs, FfmpegEngine},
    template::{self, TemplateRegions},
    video::{overlay, segment::SegmentBuilder, transition, BuiltSegment, NormalizedTransition},
};

/// How segments are rendered for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Full-screen slideshow segments
    Flat,
    /// Segments composited into the template's main region, with anchor
    /// footage looping in the anchor region
    Template,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Flat => "flat",
            Mode::Template => "template",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "flat" | "video" => Ok(Mode::Flat),
            "template" | "with_template" => Ok(Mode::Template),
            other => Err(format!(
                "unknown mode '{}', expected 'flat' or 'template'",
                other
            )),
        }
    }
}

/// Main assembly engine orchestrating the batch pipeline
///
/// The pipeline runs each stage to completion before the next begins:
/// 1. Template analysis - detect main/anchor regions (template mode only)
/// 2. Asset discovery - enumerate and pair audio tracks with image folders
/// 3. Transition normalization - one-shot re-encode of the transition clip
/// 4. Segment synthesis - one duration-matched clip per pair
/// 5. Timeline assembly - concatenate segments and transitions
/// 6. Presenter overlay - time-windowed composite of the record clip
pub struct AssemblyEngine {
    config: Config,
    media: FfmpegEngine,
}

impl AssemblyEngine {
    /// Create an engine using the system ffmpeg/ffprobe binaries
    pub fn new(config: Config) -> Self {
        Self {
            config,
            media: FfmpegEngine::new(),
        }
    }

    /// Create an engine with a custom transcoder configuration
    pub fn with_media_engine(config: Config, media: FfmpegEngine) -> Self {
        Self { config, media }
    }

    /// Assemble `output/final_video.mp4` from the assets under `base_folder`.
    ///
    /// On success exactly one output file is deposited; on failure no output
    /// file is left behind and intermediates are removed best-effort.
    pub async fn create_final_video(&self, base_folder: &Path, mode: Mode) -> Result<PathBuf> {
        let workspace = Workspace::prepare(base_folder)?;

        match self.run_pipeline(&workspace, mode).await {
            Ok(output) => {
                workspace.cleanup();
                Ok(output)
            }
            Err(e) => {
                // Fatal runs must leave no final output file
                let _ = std::fs::remove_file(workspace.final_output());
                workspace.cleanup();
                Err(e)
            }
        }
    }

    async fn run_pipeline(&self, workspace: &Workspace, mode: Mode) -> Result<PathBuf> {
        info!("Starting video assembly");
        info!("   Folder: {:?}", workspace.base());
        info!("   Mode: {}", mode.name());

        // Pipeline Step 1: Template analysis (template mode only)
        let regions = match mode {
            Mode::Template => Some(self.analyze_template(workspace)?),
            Mode::Flat => None,
        };

        // Pipeline Step 2: Asset discovery and pairing
        let pairs = self.discover_assets(workspace)?;

        // Pipeline Step 3: Transition normalization
        let transition = transition::normalize(&self.media, &self.config, workspace).await?;

        // Pipeline Step 4: Segment synthesis
        let segments = self
            .build_segments(workspace, &pairs, mode, regions.as_ref())
            .await?;

        // Pipeline Step 5: Timeline assembly
        let durations: Vec<f64> = segments.iter().map(|s| s.duration).collect();
        let timeline = Timeline::from_durations(&durations, transition.as_ref().map(|t| t.duration));

        info!(
            "Total video duration: {:.1}s ({} segments, {:.1}s segment time)",
            timeline.total_duration(),
            segments.len(),
            timeline.segment_total()
        );

        let base_track = self
            .assemble_base_track(workspace, &segments, transition.as_ref())
            .await?;

        // Pipeline Step 6: Presenter overlay and final placement
        let output = self
            .finalize_output(workspace, base_track, &timeline, mode)
            .await?;

        info!("Video completed: {:?}", output);
        Ok(output)
    }

    // ==========================================
    // PIPELINE STEP 1: TEMPLATE ANALYSIS
    // ==========================================

    fn analyze_template(&self, workspace: &Workspace) -> Result<TemplateRegions> {
        let template = workspace.template_image();
        if !template.exists() {
            return Err(AssetError::MissingAsset {
                name: "template.png".to_string(),
                path: template,
            }
            .into());
        }

        let anchor = workspace.anchor_video();
        if !anchor.exists() {
            return Err(AssetError::MissingAsset {
                name: "anchor.mp4".to_string(),
                path: anchor,
            }
            .into());
        }

        template::detect_regions(&template)
    }

    // ==========================================
    // PIPELINE STEP 2: ASSET DISCOVERY
    // ==========================================

    fn discover_assets(&self, workspace: &Workspace) -> Result<Vec<AssetPair>> {
        let audio = assets::audio_tracks(workspace.base())?;
        if audio.is_empty() {
            return Err(AssetError::NoAudioTracks {
                path: workspace.base().to_path_buf(),
            }
            .into());
        }

        let folders = assets::image_folders(workspace.base())?;
        if folders.is_empty() {
            return Err(AssetError::NoImageFolders {
                path: workspace.base().to_path_buf(),
            }
            .into());
        }

        Ok(assets::pair(audio, folders))
    }

    // ==========================================
    // PIPELINE STEP 4: SEGMENT SYNTHESIS
    // ==========================================

    async fn build_segments(
        &self,
        workspace: &Workspace,
        pairs: &[AssetPair],
        mode: Mode,
        regions: Option<&TemplateRegions>,
    ) -> Result<Vec<BuiltSegment>> {
        let builder = SegmentBuilder::new(&self.media, &self.config, workspace);
        let mut segments = Vec::new();

        for (i, pair) in pairs.iter().enumerate() {
            let index = i + 1;
            info!("Processing segment {}/{}", index, pairs.len());
            info!("   Audio: {:?}", pair.audio.file_name().unwrap_or_default());
            info!(
                "   Folder: {:?}",
                pair.image_dir.file_name().unwrap_or_default()
            );

            let images = assets::images_in(&pair.image_dir)?;
            if images.is_empty() {
                warn!(
                    "Skipping segment {}: no images in {:?}",
                    index, pair.image_dir
                );
                continue;
            }
            info!("   Images: {}", images.len());

            let segment = match mode {
                Mode::Flat => builder.build_flat(index, &pair.audio, &images).await?,
                Mode::Template => {
                    // Region detection has already succeeded in template mode
                    let regions = regions.expect("template regions resolved before segment build");
                    builder
                        .build_template(index, &pair.audio, &images, regions)
                        .await?
                }
            };

            info!("   Created: {:.2}s", segment.duration);
            segments.push(segment);
        }

        if segments.is_empty() {
            return Err(AssetError::NoSegmentsProduced.into());
        }

        Ok(segments)
    }

    // ==========================================
    // PIPELINE STEP 5: TIMELINE ASSEMBLY
    // ==========================================

    /// Concatenate segments (with the transition between every adjacent pair)
    /// into the base track, then delete the consumed clips.
    async fn assemble_base_track(
        &self,
        workspace: &Workspace,
        segments: &[BuiltSegment],
        transition: Option<&NormalizedTransition>,
    ) -> Result<PathBuf> {
        info!("Merging {} segments...", segments.len());

        let mut entries: Vec<PathBuf> = Vec::new();
        for (i, segment) in segments.iter().enumerate() {
            entries.push(segment.path.clone());
            if i + 1 < segments.len() {
                if let Some(transition) = transition {
                    entries.push(transition.path.clone());
                }
            }
        }

        let list = workspace.temp_file("final_concat.txt");
        crate::video::segment::write_concat_list(&list, &entries)?;

        let base_track = workspace.temp_file("base_video.mp4");
        self.media
            .run(jobs::concat_with_audio(
                &list,
                &self.config.encode,
                &base_track,
            ))
            .await?;

        workspace.discard(&list);
        for segment in segments {
            workspace.discard(&segment.path);
        }
        if let Some(transition) = transition {
            workspace.discard(&transition.path);
        }

        Ok(base_track)
    }

    // ==========================================
    // PIPELINE STEP 6: PRESENTER OVERLAY
    // ==========================================

    /// Overlay the presenter clip if present, then deposit the final output.
    ///
    /// In flat mode the presenter spans the whole timeline; in template mode
    /// it spans only the segment windows, gated by the enable predicate.
    async fn finalize_output(
        &self,
        workspace: &Workspace,
        base_track: PathBuf,
        timeline: &Timeline,
        mode: Mode,
    ) -> Result<PathBuf> {
        let output = workspace.final_output();

        if !workspace.record_video().exists() {
            info!("No presenter clip - using base track as final output");
            std::fs::rename(&base_track, &output)?;
            return Ok(output);
        }

        let (span, enable) = match mode {
            Mode::Flat => (timeline.total_duration(), None),
            Mode::Template => (timeline.segment_total(), timeline.enable_expr()),
        };

        let presenter =
            overlay::prepare_presenter_clip(&self.media, &self.config, workspace, span).await?;

        match &enable {
            Some(_) => info!("Overlaying presenter clip during segments only..."),
            None => info!("Overlaying presenter clip throughout..."),
        }

        let graph = filters::presenter_overlay_graph(
            enable.as_deref(),
            self.config.overlay.record_bottom_margin,
        );
        self.media
            .run(jobs::presenter_overlay(
                &base_track,
                &presenter,
                &graph,
                &self.config.encode,
                &output,
            ))
            .await?;

        workspace.discard(&presenter);
        workspace.discard(&base_track);

        Ok(output)
    }
}
