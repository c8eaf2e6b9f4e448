use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

use crate::audio::assets::SoundAsset;
use crate::audio::devices::find_output_device;
use crate::audio::tone::{HumSource, ToneSource, ToneSpec, VoiceGuard};
use crate::core::error::AudioError;

/// Opens the session's audio context. Called at most once per session.
pub trait AudioPlatform {
    fn open(&self) -> Result<Box<dyn AudioOutput>, AudioError>;
}

/// An open audio context. Every call schedules an independent voice and
/// returns without waiting for it to finish.
pub trait AudioOutput {
    fn play_tone(&self, tone: ToneSpec, voice: VoiceGuard) -> Result<(), AudioError>;

    fn play_asset(&self, asset: &SoundAsset, volume: f32, voice: VoiceGuard) -> Result<(), AudioError>;

    fn start_loop(&self, bed: AmbientBed) -> Result<Box<dyn AmbientLoop>, AudioError>;
}

/// What the ambient loop is made of.
#[derive(Debug, Clone)]
pub enum AmbientBed {
    Asset { asset: SoundAsset, volume: f32 },
    Hum { volume: f32 },
}

/// A running ambient loop. Dropping it also stops playback.
pub trait AmbientLoop {
    fn stop(self: Box<Self>);
}

/// rodio-backed platform, optionally pinned to a named output device.
#[derive(Debug, Clone, Default)]
pub struct RodioPlatform {
    device_name: Option<String>,
}

impl RodioPlatform {
    pub fn new(device_name: Option<String>) -> Self {
        Self { device_name }
    }

    fn open_stream(&self) -> Result<(OutputStream, OutputStreamHandle), AudioError> {
        let device = find_output_device(self.device_name.as_deref())?;

        OutputStream::try_from_device(&device).map_err(|e| {
            log::error!("Failed to create output stream: {}", e);
            AudioError::PlatformUnavailable(format!("failed to create output stream: {}", e))
        })
    }
}

impl AudioPlatform for RodioPlatform {
    fn open(&self) -> Result<Box<dyn AudioOutput>, AudioError> {
        let (stream, handle) = self.open_stream()?;

        Ok(Box::new(RodioOutput {
            _stream: stream,
            handle,
        }))
    }
}

pub struct RodioOutput {
    // The stream must outlive every voice mixed into it.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioOutput for RodioOutput {
    fn play_tone(&self, tone: ToneSpec, voice: VoiceGuard) -> Result<(), AudioError> {
        self.handle
            .play_raw(ToneSource::new(tone, voice))
            .map_err(|e| AudioError::Playback(e.to_string()))
    }

    fn play_asset(&self, asset: &SoundAsset, volume: f32, voice: VoiceGuard) -> Result<(), AudioError> {
        self.handle
            .play_raw(asset.playback(volume, voice))
            .map_err(|e| AudioError::Playback(e.to_string()))
    }

    fn start_loop(&self, bed: AmbientBed) -> Result<Box<dyn AmbientLoop>, AudioError> {
        let sink = Sink::try_new(&self.handle)
            .map_err(|e| AudioError::Playback(e.to_string()))?;

        match bed {
            AmbientBed::Asset { asset, volume } => {
                sink.append(asset.playback(volume, VoiceGuard::detached()).repeat_infinite());
            }
            AmbientBed::Hum { volume } => {
                sink.append(HumSource::new(volume));
            }
        }
        sink.play();

        Ok(Box::new(SinkLoop { sink }))
    }
}

struct SinkLoop {
    sink: Sink,
}

impl AmbientLoop for SinkLoop {
    fn stop(self: Box<Self>) {
        self.sink.stop();
    }
}
