use rodio::{Decoder, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::audio::cue::Cue;
use crate::audio::tone::{clamp_volume, VoiceGuard};
use crate::core::error::AudioError;

/// A decoded, interleaved buffer bound to one cue.
#[derive(Debug, Clone)]
pub struct SoundAsset {
    cue: Cue,
    channels: u16,
    sample_rate: u32,
    samples: Arc<[f32]>,
}

impl SoundAsset {
    /// Rejects buffers with no channels or a zero sample rate; rodio cannot
    /// schedule them.
    pub fn new(cue: Cue, channels: u16, sample_rate: u32, samples: Vec<f32>) -> Result<Self, AudioError> {
        if channels == 0 || sample_rate == 0 {
            return Err(AudioError::InvalidFormat {
                cue: cue.to_string(),
                channels,
                sample_rate,
            });
        }

        Ok(Self {
            cue,
            channels,
            sample_rate,
            samples: samples.into(),
        })
    }

    pub fn cue(&self) -> Cue {
        self.cue
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() / self.channels as usize;
        Duration::from_secs_f64(frames as f64 / self.sample_rate as f64)
    }

    /// A fresh playback of this buffer. The samples are shared, not copied.
    pub fn playback(&self, volume: f32, voice: VoiceGuard) -> AssetPlayback {
        AssetPlayback {
            samples: Arc::clone(&self.samples),
            position: 0,
            channels: self.channels,
            sample_rate: self.sample_rate,
            volume: clamp_volume(volume),
            _voice: voice,
        }
    }
}

pub struct AssetPlayback {
    samples: Arc<[f32]>,
    position: usize,
    channels: u16,
    sample_rate: u32,
    volume: f32,
    _voice: VoiceGuard,
}

impl Iterator for AssetPlayback {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = *self.samples.get(self.position)?;
        self.position += 1;
        Some(sample * self.volume)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl Source for AssetPlayback {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.samples.len() - self.position)
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        let frames = self.samples.len() / self.channels as usize;
        Some(Duration::from_secs_f64(frames as f64 / self.sample_rate as f64))
    }
}

/// Where pre-recorded cue sounds come from. Loading runs on background
/// threads, so implementations must be shareable.
pub trait AssetLoader: Send + Sync {
    fn fetch(&self, cue: Cue) -> Result<SoundAsset, AudioError>;
}

/// Loads `<root>/sounds/<cue>.<ext>`, trying each extension in order until
/// one decodes.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_extensions(root, vec!["mp3".to_string(), "wav".to_string()])
    }

    pub fn with_extensions(root: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            extensions,
        }
    }

    pub fn sounds_dir(&self) -> PathBuf {
        self.root.join("sounds")
    }

    /// Existing files for `cue`, in extension order.
    pub fn candidates(&self, cue: Cue) -> Vec<PathBuf> {
        let sounds_dir = self.sounds_dir();
        self.extensions
            .iter()
            .map(|ext| sounds_dir.join(format!("{}.{}", cue, ext)))
            .filter(|candidate| candidate.is_file())
            .collect()
    }
}

impl AssetLoader for DirectoryAssets {
    fn fetch(&self, cue: Cue) -> Result<SoundAsset, AudioError> {
        let mut last_error = None;

        for path in self.candidates(cue) {
            log::debug!("Decoding sound asset for '{}': {}", cue, path.display());
            match decode_file(cue, &path) {
                Ok(asset) => return Ok(asset),
                Err(e @ (AudioError::AssetDecode { .. } | AudioError::EmptyAsset { .. } | AudioError::InvalidFormat { .. })) => {
                    log::debug!("Skipping {}: {}", path.display(), e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| AudioError::AssetNotFound {
            cue: cue.to_string(),
            root: self.sounds_dir(),
        }))
    }
}

/// Never finds anything; every cue stays on synthesis.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetLoader for NoAssets {
    fn fetch(&self, cue: Cue) -> Result<SoundAsset, AudioError> {
        Err(AudioError::AssetNotFound {
            cue: cue.to_string(),
            root: PathBuf::new(),
        })
    }
}

fn decode_file(cue: Cue, path: &Path) -> Result<SoundAsset, AudioError> {
    let file = File::open(path).map_err(|source| AudioError::AssetIo {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| AudioError::AssetDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    let samples: Vec<f32> = decoder.convert_samples::<f32>().collect();

    if samples.is_empty() {
        return Err(AudioError::EmptyAsset {
            path: path.to_path_buf(),
        });
    }

    SoundAsset::new(cue, channels, sample_rate, samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::sound_generator::render_tone_wav;

    #[test]
    fn test_missing_asset_reports_not_found() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let assets = DirectoryAssets::new(dir.path());

        match assets.fetch(Cue::Tick) {
            Err(AudioError::AssetNotFound { cue, root }) => {
                assert_eq!(cue, "tick");
                assert_eq!(root, dir.path().join("sounds"));
            }
            other => panic!("Unexpected fetch result: {:?}", other.map(|a| a.cue)),
        }
    }

    #[test]
    fn test_decodes_wav_asset() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let sounds = dir.path().join("sounds");
        std::fs::create_dir_all(&sounds).expect("Failed to create sounds dir");
        render_tone_wav(&sounds.join("snap.wav"), &Cue::Snap.tone(0.4)).expect("Failed to render wav");

        let asset = DirectoryAssets::new(dir.path()).fetch(Cue::Snap).expect("Failed to load asset");
        assert_eq!(asset.cue, Cue::Snap);
        assert_eq!(asset.channels, 1);
        assert_eq!(asset.sample_rate, 44100);
        assert_eq!(asset.samples.len(), 4410);
        assert!(asset.samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn test_extension_order_is_respected() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let sounds = dir.path().join("sounds");
        std::fs::create_dir_all(&sounds).expect("Failed to create sounds dir");
        std::fs::write(sounds.join("tick.mp3"), b"").expect("Failed to write placeholder");
        render_tone_wav(&sounds.join("tick.wav"), &Cue::Tick.tone(0.2)).expect("Failed to render wav");

        let mp3_first = DirectoryAssets::new(dir.path());
        assert_eq!(mp3_first.candidates(Cue::Tick), vec![sounds.join("tick.mp3"), sounds.join("tick.wav")]);

        let wav_only = DirectoryAssets::with_extensions(dir.path(), vec!["wav".to_string()]);
        assert_eq!(wav_only.candidates(Cue::Tick), vec![sounds.join("tick.wav")]);
        assert!(wav_only.fetch(Cue::Tick).is_ok());
    }

    #[test]
    fn test_broken_asset_falls_through_to_next_extension() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let sounds = dir.path().join("sounds");
        std::fs::create_dir_all(&sounds).expect("Failed to create sounds dir");
        std::fs::write(sounds.join("tick.mp3"), b"definitely not audio").expect("Failed to write junk");
        render_tone_wav(&sounds.join("tick.wav"), &Cue::Tick.tone(0.2)).expect("Failed to render wav");

        let asset = DirectoryAssets::new(dir.path()).fetch(Cue::Tick).expect("wav should load after broken mp3");
        assert_eq!(asset.cue, Cue::Tick);
        assert_eq!(asset.samples.len(), 2205);
    }

    #[test]
    fn test_undecodable_asset_is_an_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let sounds = dir.path().join("sounds");
        std::fs::create_dir_all(&sounds).expect("Failed to create sounds dir");
        std::fs::write(sounds.join("ambient.mp3"), b"definitely not audio").expect("Failed to write junk");

        let result = DirectoryAssets::new(dir.path()).fetch(Cue::Ambient);
        assert!(matches!(result, Err(AudioError::AssetDecode { .. })));
    }

    #[test]
    fn test_playback_scales_and_shares_samples() {
        let asset = SoundAsset::new(Cue::Tick, 2, 48000, vec![0.5, -0.5, 1.0, -1.0]).unwrap();
        let playback = asset.playback(0.5, VoiceGuard::detached());

        assert_eq!(playback.channels(), 2);
        assert_eq!(playback.sample_rate(), 48000);
        assert_eq!(Arc::strong_count(&asset.samples), 2);

        let samples: Vec<f32> = playback.collect();
        assert_eq!(samples, vec![0.25, -0.25, 0.5, -0.5]);
        assert_eq!(Arc::strong_count(&asset.samples), 1);
    }

    #[test]
    fn test_zero_channels_or_rate_rejected() {
        assert!(matches!(
            SoundAsset::new(Cue::Snap, 0, 44100, vec![0.1; 8]),
            Err(AudioError::InvalidFormat { channels: 0, .. })
        ));
        assert!(matches!(
            SoundAsset::new(Cue::Snap, 1, 0, vec![0.1; 8]),
            Err(AudioError::InvalidFormat { sample_rate: 0, .. })
        ));

        let asset = SoundAsset::new(Cue::Snap, 2, 100, vec![0.0; 100]).unwrap();
        assert_eq!(asset.duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_no_assets_never_binds() {
        for cue in Cue::ALL {
            assert!(NoAssets.fetch(cue).is_err());
        }
    }
}
