//! Fakes for the audio seams, shared by the crate's tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};

use crate::audio::assets::{AssetLoader, SoundAsset};
use crate::audio::manager::CueAudio;
use crate::audio::output::{AmbientBed, AmbientLoop, AudioOutput, AudioPlatform};
use crate::audio::tone::{ToneSpec, VoiceGuard};
use crate::audio::Cue;
use crate::core::AudioError;

#[derive(Debug, Clone, PartialEq)]
pub enum Played {
    Tone(ToneSpec),
    Asset { cue: Cue, volume: f32 },
    LoopStarted { from_asset: bool, volume: f32 },
    LoopStopped,
}

/// Shared view of everything the fake output was asked to do.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Played>>>,
    opens: Arc<AtomicUsize>,
    held_voices: Arc<Mutex<Vec<VoiceGuard>>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Played> {
        self.events.lock().unwrap().clone()
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn push(&self, played: Played) {
        self.events.lock().unwrap().push(played);
    }

    /// Lets every held voice finish its envelope.
    pub fn finish_voices(&self) {
        self.held_voices.lock().unwrap().clear();
    }
}

pub struct FakePlatform {
    pub recorder: Recorder,
    pub available: bool,
}

impl AudioPlatform for FakePlatform {
    fn open(&self) -> Result<Box<dyn AudioOutput>, AudioError> {
        self.recorder.opens.fetch_add(1, Ordering::SeqCst);
        if self.available {
            Ok(Box::new(FakeOutput { recorder: self.recorder.clone() }))
        } else {
            Err(AudioError::PlatformUnavailable("no audio API".to_string()))
        }
    }
}

struct FakeOutput {
    recorder: Recorder,
}

impl AudioOutput for FakeOutput {
    fn play_tone(&self, tone: ToneSpec, voice: VoiceGuard) -> Result<(), AudioError> {
        self.recorder.push(Played::Tone(tone));
        self.recorder.held_voices.lock().unwrap().push(voice);
        Ok(())
    }

    fn play_asset(&self, asset: &SoundAsset, volume: f32, voice: VoiceGuard) -> Result<(), AudioError> {
        self.recorder.push(Played::Asset { cue: asset.cue(), volume });
        self.recorder.held_voices.lock().unwrap().push(voice);
        Ok(())
    }

    fn start_loop(&self, bed: AmbientBed) -> Result<Box<dyn AmbientLoop>, AudioError> {
        let played = match bed {
            AmbientBed::Asset { volume, .. } => Played::LoopStarted { from_asset: true, volume },
            AmbientBed::Hum { volume } => Played::LoopStarted { from_asset: false, volume },
        };
        self.recorder.push(played);
        Ok(Box::new(FakeLoop { recorder: self.recorder.clone() }))
    }
}

struct FakeLoop {
    recorder: Recorder,
}

impl AmbientLoop for FakeLoop {
    fn stop(self: Box<Self>) {
        self.recorder.push(Played::LoopStopped);
    }
}

/// Serves a small buffer for the listed cues and fails the rest.
pub struct PartialAssets {
    pub bound: Vec<Cue>,
}

impl AssetLoader for PartialAssets {
    fn fetch(&self, cue: Cue) -> Result<SoundAsset, AudioError> {
        if self.bound.contains(&cue) {
            SoundAsset::new(cue, 1, 44100, vec![0.1; 64])
        } else {
            Err(AudioError::AssetNotFound {
                cue: cue.to_string(),
                root: "sounds".into(),
            })
        }
    }
}

/// Holds one cue's asset back until the test opens the gate; every other
/// cue fails straight away.
pub struct GatedAssets {
    cue: Cue,
    gate: Mutex<mpsc::Receiver<()>>,
}

impl GatedAssets {
    pub fn new(cue: Cue) -> (Self, mpsc::Sender<()>) {
        let (gate, gate_rx) = mpsc::channel();
        (Self { cue, gate: Mutex::new(gate_rx) }, gate)
    }
}

impl AssetLoader for GatedAssets {
    fn fetch(&self, cue: Cue) -> Result<SoundAsset, AudioError> {
        if cue != self.cue {
            return Err(AudioError::AssetNotFound { cue: cue.to_string(), root: "sounds".into() });
        }
        self.gate
            .lock()
            .unwrap()
            .recv()
            .map_err(|e| AudioError::Playback(e.to_string()))?;
        SoundAsset::new(cue, 1, 44100, vec![0.1; 64])
    }
}

pub fn create_test_audio(available: bool, loader: Arc<dyn AssetLoader>) -> (CueAudio, Recorder) {
    let recorder = Recorder::default();
    let platform = FakePlatform {
        recorder: recorder.clone(),
        available,
    };
    (CueAudio::new(Box::new(platform), loader), recorder)
}

