//! Deterministic filter-string construction.
//!
//! Every function here is pure: identical inputs always produce the identical
//! descriptor, so tests can assert on the generated strings.

use crate::config::OverlayConfig;
use crate::template::TemplateRegions;

/// Zoom ceiling for the still-image motion effect (2.5%)
const ZOOM_CEILING: f64 = 1.025;

/// Per-frame zoom increment; reaches the ceiling over roughly the clip length
const ZOOM_STEP: f64 = 0.00012;

/// Motion effect for a still image: slow center-anchored zoom from 1.0x to
/// the ceiling, a 2 px sinusoidal jitter, then a crop/scale back to exact
/// target dimensions.
pub fn motion_effect(duration: f64, width: u32, height: u32, fps: u32) -> String {
    let zoomed_w = (width as f64 * ZOOM_CEILING) as u32;
    let zoomed_h = (height as f64 * ZOOM_CEILING) as u32;
    let frames = (duration * fps as f64) as u32;

    format!(
        "scale={zoomed_w}:{zoomed_h},\
         zoompan=z='min(zoom+{ZOOM_STEP},{ZOOM_CEILING})':d={frames}:\
         x='iw/2-(iw/zoom/2)':y='ih/2-(ih/zoom/2)':s={width}x{height},\
         crop=iw-4:ih-4:2+2*sin(n/20):2+2*sin(n/17),\
         scale={width}:{height},setsar=1"
    )
}

/// Scale preserving aspect ratio, letterboxed onto a black canvas.
pub fn letterbox_scale(width: u32, height: u32) -> String {
    format!(
        "scale={width}:{height}:force_original_aspect_ratio=decrease,\
         pad={width}:{height}:(ow-iw)/2:(oh-ih)/2:black"
    )
}

/// Re-encode filter bringing a transition clip to the canonical format.
pub fn transition_normalize(width: u32, height: u32, fps: u32) -> String {
    format!("{},fps={fps}", letterbox_scale(width, height))
}

/// Scale-to-fill + crop used for the anchor loop inside its template region.
pub fn anchor_fill(width: u32, height: u32, fps: u32) -> String {
    format!(
        "scale={width}:{height}:force_original_aspect_ratio=increase,\
         crop={width}:{height},fps={fps}"
    )
}

/// Filter graph compositing one segment in template mode.
///
/// Layer order is fixed: black base, then the main-region slideshow, then the
/// anchor loop, then the chromakeyed template artwork on top so its non-key
/// pixels always render topmost.
pub fn template_composite_graph(
    regions: &TemplateRegions,
    width: u32,
    height: u32,
    duration: f64,
    fps: u32,
    overlay: &OverlayConfig,
) -> String {
    format!(
        "color=black:s={width}x{height}:d={duration},fps={fps}[base];\
         [base][0:v]overlay={main_x}:{main_y}[with_main];\
         [with_main][1:v]overlay={anchor_x}:{anchor_y}[with_anchor];\
         [2:v]chromakey={key}:{similarity}:{blend}[template_keyed];\
         [with_anchor][template_keyed]overlay=0:0[final]",
        main_x = regions.main.x,
        main_y = regions.main.y,
        anchor_x = regions.anchor.x,
        anchor_y = regions.anchor.y,
        key = overlay.key_color,
        similarity = overlay.template_similarity,
        blend = overlay.template_blend,
    )
}

/// Scale filter for the presenter clip: plain scale when the source already
/// matches the target aspect ratio, letterbox otherwise.
pub fn record_scale(src_width: u32, src_height: u32, width: u32, height: u32) -> String {
    let src_aspect = src_width as f64 / src_height as f64;
    let target_aspect = width as f64 / height as f64;

    if (src_aspect - target_aspect).abs() < 0.01 {
        format!("scale={width}:{height}")
    } else {
        letterbox_scale(width, height)
    }
}

/// Presenter clip preparation: scale to frame size and key out the backdrop.
pub fn record_prep(scale: &str, overlay: &OverlayConfig) -> String {
    format!(
        "{scale},chromakey={key}:{similarity}:{blend}",
        key = overlay.key_color,
        similarity = overlay.record_similarity,
        blend = overlay.record_blend,
    )
}

/// Final composite graph overlaying the presenter clip onto the base track.
///
/// `enable` gates per-frame visibility; `None` means always visible and omits
/// the predicate entirely.
pub fn presenter_overlay_graph(enable: Option<&str>, bottom_margin: i32) -> String {
    match enable {
        Some(expr) => format!(
            "[1:v]format=rgba[fg];\
             [0:v][fg]overlay=0:main_h-overlay_h+{bottom_margin}:enable='{expr}':format=auto"
        ),
        None => format!(
            "[1:v]format=rgba[fg];\
             [0:v][fg]overlay=0:main_h-overlay_h+{bottom_margin}:format=auto"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Region;

    #[test]
    fn test_motion_effect_is_deterministic() {
        let a = motion_effect(3.5, 1920, 1080, 30);
        let b = motion_effect(3.5, 1920, 1080, 30);
        assert_eq!(a, b);
    }

    #[test]
    fn test_motion_effect_parameters() {
        let filter = motion_effect(4.0, 1920, 1080, 30);

        // 2.5% oversize before the pan, 120 frames for 4s at 30 fps
        assert!(filter.starts_with("scale=1967:1107,"));
        assert!(filter.contains("zoompan=z='min(zoom+0.00012,1.025)':d=120:"));
        assert!(filter.contains("s=1920x1080"));
        assert!(filter.ends_with("scale=1920:1080,setsar=1"));
    }

    #[test]
    fn test_motion_effect_respects_region_size() {
        let filter = motion_effect(2.0, 640, 480, 30);
        assert!(filter.contains("s=640x480"));
        assert!(filter.contains("d=60"));
    }

    #[test]
    fn test_template_composite_layer_order() {
        let regions = TemplateRegions {
            main: Region {
                x: 100,
                y: 50,
                width: 800,
                height: 450,
            },
            anchor: Region {
                x: 1200,
                y: 600,
                width: 400,
                height: 300,
            },
        };
        let graph = template_composite_graph(
            &regions,
            1920,
            1080,
            12.5,
            30,
            &OverlayConfig::default(),
        );

        let base = graph.find("color=black:s=1920x1080:d=12.5").unwrap();
        let main = graph.find("overlay=100:50[with_main]").unwrap();
        let anchor = graph.find("overlay=1200:600[with_anchor]").unwrap();
        let keyed = graph.find("chromakey=0x00FF00:0.1:0[template_keyed]").unwrap();
        let top = graph.find("[with_anchor][template_keyed]overlay=0:0[final]").unwrap();

        assert!(base < main && main < anchor && anchor < keyed && keyed < top);
    }

    #[test]
    fn test_record_scale_keeps_matching_aspect() {
        assert_eq!(record_scale(1280, 720, 1920, 1080), "scale=1920:1080");
        assert!(record_scale(1080, 1080, 1920, 1080).contains("force_original_aspect_ratio"));
    }

    #[test]
    fn test_presenter_overlay_graph_with_and_without_enable() {
        let gated = presenter_overlay_graph(Some("between(t,0,10)+between(t,12,20)"), 32);
        assert!(gated.contains("enable='between(t,0,10)+between(t,12,20)'"));
        assert!(gated.contains("overlay=0:main_h-overlay_h+32"));

        let always = presenter_overlay_graph(None, 32);
        assert!(!always.contains("enable="));
    }

    #[test]
    fn test_anchor_fill_crops_to_region() {
        let filter = anchor_fill(400, 300, 30);
        assert!(filter.contains("force_original_aspect_ratio=increase"));
        assert!(filter.contains("crop=400:300"));
    }
}
