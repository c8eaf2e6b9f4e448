use std::path::PathBuf;
use thiserror::Error;

/// Failures inside the cue audio stack. None of these reach the host: the
/// manager logs them and degrades to synthesis or silence.
#[derive(Error, Debug)]
pub enum AudioError {
    /// No audio output could be opened for this session
    #[error("Audio output unavailable: {0}")]
    PlatformUnavailable(String),

    /// No file for the cue under the asset root
    #[error("No sound asset found for '{cue}' under {}", .root.display())]
    AssetNotFound { cue: String, root: PathBuf },

    #[error("Failed to read sound asset {}: {source}", .path.display())]
    AssetIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode sound asset {}: {message}", .path.display())]
    AssetDecode { path: PathBuf, message: String },

    /// The asset decoded to zero samples
    #[error("Sound asset {} contains no audio", .path.display())]
    EmptyAsset { path: PathBuf },

    /// Decoded buffer with a format no output can play
    #[error("Sound asset for '{cue}' has {channels} channel(s) at {sample_rate} Hz")]
    InvalidFormat { cue: String, channels: u16, sample_rate: u32 },

    /// The configured output device is not present
    #[error("Audio output device '{0}' not found")]
    DeviceNotFound(String),

    #[error("Unknown cue: {0}")]
    UnknownCue(String),

    /// Submitting a source to the output failed
    #[error("Playback failed: {0}")]
    Playback(String),
}
