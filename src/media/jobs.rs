//! Argument-vector builders for every transcode job the engine runs.
//!
//! Builders are pure functions so the exact invocations can be asserted on in
//! tests without spawning the external tool.

use std::path::Path;

use crate::config::EncodeConfig;

fn p(path: &Path) -> String {
    path.display().to_string()
}

fn video_encode_args(encode: &EncodeConfig) -> Vec<String> {
    vec![
        "-c:v".into(),
        "libx264".into(),
        "-preset".into(),
        encode.preset.clone(),
        "-crf".into(),
        encode.crf.to_string(),
        "-pix_fmt".into(),
        "yuv420p".into(),
    ]
}

fn audio_encode_args(encode: &EncodeConfig) -> Vec<String> {
    vec![
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        encode.audio_bitrate.clone(),
        "-ar".into(),
        encode.audio_sample_rate.to_string(),
    ]
}

/// Loop a still image through a motion filter into a clip of `duration`.
pub fn still_motion_clip(
    image: &Path,
    filter: &str,
    duration: f64,
    fps: u32,
    encode: &EncodeConfig,
    output: &Path,
) -> Vec<String> {
    let mut args = vec![
        "-y".into(),
        "-loop".into(),
        "1".into(),
        "-i".into(),
        p(image),
        "-vf".into(),
        filter.into(),
        "-t".into(),
        duration.to_string(),
    ];
    args.extend(video_encode_args(encode));
    args.extend(["-r".into(), fps.to_string(), p(output)]);
    args
}

/// Stream-copy remux, used when a one-clip slideshow needs no concat pass.
pub fn copy_remux(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-i".into(),
        p(input),
        "-c".into(),
        "copy".into(),
        p(output),
    ]
}

/// Concatenate the clips listed in a concat file, video only.
pub fn concat_video(list: &Path, encode: &EncodeConfig, output: &Path) -> Vec<String> {
    let mut args = concat_prefix(list);
    args.extend(video_encode_args(encode));
    args.push(p(output));
    args
}

/// Concatenate the clips listed in a concat file, re-encoding both streams.
pub fn concat_with_audio(list: &Path, encode: &EncodeConfig, output: &Path) -> Vec<String> {
    let mut args = concat_prefix(list);
    args.extend(video_encode_args(encode));
    args.extend(audio_encode_args(encode));
    args.push(p(output));
    args
}

fn concat_prefix(list: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        p(list),
    ]
}

/// Mux an audio track onto a video clip, truncating to the shorter of the two.
pub fn mux_audio(
    video: &Path,
    audio: &Path,
    encode: &EncodeConfig,
    output: &Path,
) -> Vec<String> {
    let mut args = vec![
        "-y".into(),
        "-i".into(),
        p(video),
        "-i".into(),
        p(audio),
        "-c:v".into(),
        "copy".into(),
    ];
    args.extend(audio_encode_args(encode));
    args.extend(["-shortest".into(), p(output)]);
    args
}

/// Loop a clip indefinitely through a filter, truncated to `duration`, muted.
pub fn loop_clip(
    input: &Path,
    filter: &str,
    duration: f64,
    encode: &EncodeConfig,
    output: &Path,
) -> Vec<String> {
    let mut args = vec![
        "-y".into(),
        "-stream_loop".into(),
        "-1".into(),
        "-i".into(),
        p(input),
        "-vf".into(),
        filter.into(),
        "-t".into(),
        duration.to_string(),
    ];
    args.extend(video_encode_args(encode));
    args.extend(["-an".into(), p(output)]);
    args
}

/// Composite slideshow + anchor loop + looping template image through a
/// filter graph, mapping its `[final]` output.
pub fn template_composite(
    slideshow: &Path,
    anchor: &Path,
    template: &Path,
    graph: &str,
    duration: f64,
    encode: &EncodeConfig,
    output: &Path,
) -> Vec<String> {
    let mut args = vec![
        "-y".into(),
        "-i".into(),
        p(slideshow),
        "-i".into(),
        p(anchor),
        "-stream_loop".into(),
        "-1".into(),
        "-i".into(),
        p(template),
        "-filter_complex".into(),
        graph.into(),
        "-map".into(),
        "[final]".into(),
        "-t".into(),
        duration.to_string(),
    ];
    args.extend(video_encode_args(encode));
    args.push(p(output));
    args
}

/// One-shot re-encode of a transition clip to the canonical format.
pub fn normalize_transition(
    input: &Path,
    filter: &str,
    encode: &EncodeConfig,
    output: &Path,
) -> Vec<String> {
    let mut args = vec![
        "-y".into(),
        "-i".into(),
        p(input),
        "-vf".into(),
        filter.into(),
    ];
    args.extend(video_encode_args(encode));
    args.extend(audio_encode_args(encode));
    args.push(p(output));
    args
}

/// Prepare the presenter clip: finite loop count, keying filter, alpha-capable
/// png codec so the keyed background stays transparent.
pub fn record_loop(
    input: &Path,
    filter: &str,
    loops: u32,
    duration: f64,
    fps: u32,
    output: &Path,
) -> Vec<String> {
    vec![
        "-y".into(),
        "-stream_loop".into(),
        loops.to_string(),
        "-i".into(),
        p(input),
        "-vf".into(),
        filter.into(),
        "-t".into(),
        duration.to_string(),
        "-c:v".into(),
        "png".into(),
        "-r".into(),
        fps.to_string(),
        "-pix_fmt".into(),
        "rgba".into(),
        "-an".into(),
        p(output),
    ]
}

/// Final pass: overlay the prepared presenter clip onto the base track.
pub fn presenter_overlay(
    base: &Path,
    record: &Path,
    graph: &str,
    encode: &EncodeConfig,
    output: &Path,
) -> Vec<String> {
    vec![
        "-y".into(),
        "-i".into(),
        p(base),
        "-i".into(),
        p(record),
        "-filter_complex".into(),
        graph.into(),
        "-c:v".into(),
        "libx264".into(),
        "-preset".into(),
        encode.final_preset.clone(),
        "-crf".into(),
        encode.final_crf.to_string(),
        "-c:a".into(),
        "copy".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        p(output),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn enc() -> EncodeConfig {
        EncodeConfig::default()
    }

    #[test]
    fn test_mux_audio_truncates_to_shortest() {
        let args = mux_audio(
            &PathBuf::from("video.mp4"),
            &PathBuf::from("track.mp3"),
            &enc(),
            &PathBuf::from("out.mp4"),
        );

        assert!(args.contains(&"-shortest".to_string()));
        // Video stream is copied, audio re-encoded
        let cv = args.iter().position(|a| a == "-c:v").unwrap();
        assert_eq!(args[cv + 1], "copy");
        assert!(args.contains(&"aac".to_string()));
        assert!(args.contains(&"192k".to_string()));
    }

    #[test]
    fn test_still_motion_clip_loops_input() {
        let args = still_motion_clip(
            &PathBuf::from("img.png"),
            "scale=10:10",
            2.5,
            30,
            &enc(),
            &PathBuf::from("clip.mp4"),
        );

        assert_eq!(args[1], "-loop");
        assert_eq!(args[2], "1");
        let t = args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(args[t + 1], "2.5");
        assert!(args.contains(&"yuv420p".to_string()));
    }

    #[test]
    fn test_concat_uses_unsafe_paths() {
        let args = concat_video(&PathBuf::from("list.txt"), &enc(), &PathBuf::from("out.mp4"));
        let f = args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(args[f + 1], "concat");
        assert!(args.contains(&"-safe".to_string()));
    }

    #[test]
    fn test_loop_clip_is_muted_and_truncated() {
        let args = loop_clip(
            &PathBuf::from("anchor.mp4"),
            "crop=10:10",
            7.25,
            &enc(),
            &PathBuf::from("loop.mp4"),
        );

        assert_eq!(args[1], "-stream_loop");
        assert_eq!(args[2], "-1");
        assert!(args.contains(&"-an".to_string()));
        assert!(args.contains(&"7.25".to_string()));
    }

    #[test]
    fn test_template_composite_maps_final_label() {
        let args = template_composite(
            &PathBuf::from("slideshow.mp4"),
            &PathBuf::from("anchor.mp4"),
            &PathBuf::from("template.png"),
            "[x]overlay[final]",
            10.0,
            &enc(),
            &PathBuf::from("out.mp4"),
        );

        let map = args.iter().position(|a| a == "-map").unwrap();
        assert_eq!(args[map + 1], "[final]");
        assert!(args.contains(&"-filter_complex".to_string()));
    }

    #[test]
    fn test_record_loop_keeps_alpha() {
        let args = record_loop(
            &PathBuf::from("record.mp4"),
            "chromakey=0x00FF00:0.15:0.05",
            4,
            30.0,
            30,
            &PathBuf::from("record.mov"),
        );

        assert!(args.contains(&"png".to_string()));
        assert!(args.contains(&"rgba".to_string()));
        assert_eq!(args[1], "-stream_loop");
        assert_eq!(args[2], "4");
    }

    #[test]
    fn test_presenter_overlay_copies_audio() {
        let args = presenter_overlay(
            &PathBuf::from("base.mp4"),
            &PathBuf::from("record.mov"),
            "[0:v][1:v]overlay",
            &enc(),
            &PathBuf::from("final.mp4"),
        );

        let ca = args.iter().position(|a| a == "-c:a").unwrap();
        assert_eq!(args[ca + 1], "copy");
        assert!(args.contains(&"medium".to_string()));
        assert!(args.contains(&"23".to_string()));
    }
}
