use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the newsreel assembly engine
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Media engine error: {0}")]
    Media(#[from] MediaError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Asset discovery and layout errors
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("No audio tracks found in {path}")]
    NoAudioTracks { path: PathBuf },

    #[error("No image folders found in {path}")]
    NoImageFolders { path: PathBuf },

    #[error("Required asset '{name}' not found at {path}")]
    MissingAsset { name: String, path: PathBuf },

    #[error("No segments could be produced from the available assets")]
    NoSegmentsProduced,
}

/// Template analysis errors
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to decode template image {path}: {reason}")]
    DecodeFailed { path: PathBuf, reason: String },

    #[error("Found {found} key-color regions in template, need 2 (main + anchor)")]
    RegionDetection { found: usize },
}

/// External transcoding engine errors
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Could not launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("Could not parse {tool} output for {path}: {reason}")]
    ProbeParse {
        tool: String,
        path: PathBuf,
        reason: String,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using AssemblyError
pub type Result<T> = std::result::Result<T, AssemblyError>;

impl AssemblyError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Asset(AssetError::NoAudioTracks { path }) => {
                format!(
                    "No audio tracks found in '{}'. Place .mp3/.wav/... files next to the numbered image folders.",
                    path.display()
                )
            }
            Self::Asset(AssetError::MissingAsset { name, path }) => {
                format!(
                    "Template mode needs '{}' but '{}' does not exist.",
                    name,
                    path.display()
                )
            }
            Self::Template(TemplateError::RegionDetection { found }) => {
                format!(
                    "Template analysis found {} key-color regions; the template must contain exactly two (main screen + anchor).",
                    found
                )
            }
            Self::Media(MediaError::Launch { tool, .. }) => {
                format!("Could not run '{}'. Is FFmpeg installed and on PATH?", tool)
            }
            _ => self.to_string(),
        }
    }
}
