//! # Asset Discovery
//!
//! Enumerates the audio tracks and numbered image folders that make up a
//! project, orders them by the first integer embedded in each name, and pairs
//! them positionally into segment inputs.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;

/// Recognized audio track extensions (closed list)
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "aac", "ogg", "flac"];

/// Recognized still image extensions (closed list)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp", "tiff"];

/// Folder names reserved for engine output and never treated as image folders
pub const RESERVED_DIRS: &[&str] = &["output", "temp"];

/// One segment's worth of input: an audio track and its image folder
#[derive(Debug, Clone)]
pub struct AssetPair {
    pub audio: PathBuf,
    pub image_dir: PathBuf,
}

/// Ordering key: the first run of digits in the name, parsed as an integer.
///
/// Names without digits sort as 0; ties keep discovery order (stable sort).
pub fn numeric_key(name: &str) -> u64 {
    let digits: String = name
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

fn file_name_key(path: &Path) -> u64 {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(numeric_key)
        .unwrap_or(0)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some(ext) if extensions.contains(&ext.to_lowercase().as_str())
    )
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// List the audio tracks directly under `base`, in numeric order.
pub fn audio_tracks(base: &Path) -> Result<Vec<PathBuf>> {
    let mut tracks = Vec::new();
    for entry in std::fs::read_dir(base)? {
        let path = entry?.path();
        if path.is_file() && !is_hidden(&path) && has_extension(&path, AUDIO_EXTENSIONS) {
            tracks.push(path);
        }
    }
    tracks.sort_by_key(|p| file_name_key(p));
    Ok(tracks)
}

/// List the per-segment image folders under `base`, in numeric order.
///
/// Reserved output/temp folders are excluded.
pub fn image_folders(base: &Path) -> Result<Vec<PathBuf>> {
    let mut folders = Vec::new();
    for entry in std::fs::read_dir(base)? {
        let path = entry?.path();
        let reserved = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| RESERVED_DIRS.contains(&n))
            .unwrap_or(false);
        if path.is_dir() && !is_hidden(&path) && !reserved {
            folders.push(path);
        }
    }
    folders.sort_by_key(|p| file_name_key(p));
    Ok(folders)
}

/// List the images inside one segment folder, in numeric order.
pub fn images_in(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && !is_hidden(&path) && has_extension(&path, IMAGE_EXTENSIONS) {
            images.push(path);
        }
    }
    images.sort_by_key(|p| file_name_key(p));
    Ok(images)
}

/// Zip audio tracks and image folders positionally into segment inputs.
///
/// A count mismatch is a warning, not a failure: the surplus on either side
/// is discarded and only matched pairs are processed.
pub fn pair(audio: Vec<PathBuf>, folders: Vec<PathBuf>) -> Vec<AssetPair> {
    if audio.len() != folders.len() {
        warn!(
            "Audio track count ({}) and image folder count ({}) differ; pairing the first {}",
            audio.len(),
            folders.len(),
            audio.len().min(folders.len())
        );
    }

    audio
        .into_iter()
        .zip(folders)
        .map(|(audio, image_dir)| AssetPair { audio, image_dir })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_numeric_key_extraction() {
        assert_eq!(numeric_key("seg10"), 10);
        assert_eq!(numeric_key("02_intro.mp3"), 2);
        assert_eq!(numeric_key("part3of4"), 3);
        assert_eq!(numeric_key("no-digits"), 0);
    }

    #[test]
    fn test_numeric_folder_ordering() {
        let dir = tempdir().unwrap();
        for name in ["seg2", "seg10", "seg1"] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }

        let folders = image_folders(dir.path()).unwrap();
        let names: Vec<_> = folders
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["seg1", "seg2", "seg10"]);
    }

    #[test]
    fn test_reserved_folders_excluded() {
        let dir = tempdir().unwrap();
        for name in ["1_story", "output", "temp"] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }

        let folders = image_folders(dir.path()).unwrap();
        assert_eq!(folders.len(), 1);
        assert!(folders[0].ends_with("1_story"));
    }

    #[test]
    fn test_audio_extension_filtering() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("1.mp3"));
        touch(&dir.path().join("2.WAV"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("3.flac"));

        let tracks = audio_tracks(dir.path()).unwrap();
        assert_eq!(tracks.len(), 3);
    }

    #[test]
    fn test_images_ordered_numerically() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("img12.png"));
        touch(&dir.path().join("img2.jpg"));
        touch(&dir.path().join("img1.webp"));
        touch(&dir.path().join("thumbs.db"));

        let images = images_in(dir.path()).unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["img1.webp", "img2.jpg", "img12.png"]);
    }

    #[test]
    fn test_pair_discards_surplus() {
        let audio: Vec<PathBuf> = (1..=5).map(|i| PathBuf::from(format!("{i}.mp3"))).collect();
        let folders: Vec<PathBuf> = (1..=3).map(|i| PathBuf::from(format!("seg{i}"))).collect();

        let pairs = pair(audio, folders);
        assert_eq!(pairs.len(), 3);
        assert!(pairs[2].audio.ends_with("3.mp3"));
        assert!(pairs[2].image_dir.ends_with("seg3"));
    }
}
