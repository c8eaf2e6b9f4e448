use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::audio::assets::{AssetLoader, DirectoryAssets, SoundAsset};
use crate::audio::cue::Cue;
use crate::audio::output::{AmbientBed, AmbientLoop, AudioOutput, AudioPlatform, RodioPlatform};
use crate::audio::tone::{ToneSpec, VoiceGuard};
use crate::core::config::AudioConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No output opened yet; playback is silent
    Uninitialized,
    /// Output open; each cue plays its asset or a synthesized tone
    Ready,
    /// Opening the output failed; playback is silent for the rest of the session
    Disabled,
}

/// How a cue will sound on the next call.
#[derive(Debug, Clone)]
pub enum CueBinding {
    Bound(SoundAsset),
    Synthesized(ToneSpec),
}

type AssetTable = Arc<Mutex<HashMap<Cue, SoundAsset>>>;

/// The running ambient bed and whether it plays the ambient asset.
struct RunningAmbient {
    handle: Box<dyn AmbientLoop>,
    from_asset: bool,
}

/// Background asset loads started by [`CueAudio::initialize`]. Dropping the
/// handle detaches the loaders; they still bind their cue when they finish.
#[derive(Debug, Default)]
pub struct AssetLoad {
    loaders: Vec<(Cue, JoinHandle<()>)>,
}

impl AssetLoad {
    pub fn is_finished(&self) -> bool {
        self.loaders.iter().all(|(_, handle)| handle.is_finished())
    }

    /// Blocks until every loader has bound its cue or given up.
    pub fn wait(self) {
        for (cue, handle) in self.loaders {
            if handle.join().is_err() {
                log::warn!("Asset loader for '{}' panicked; cue stays synthesized", cue);
            }
        }
    }
}

/// Best-effort audio feedback for the dashboard cues.
///
/// Constructed by the composition root and passed down by reference. The
/// output is opened lazily by [`initialize`](Self::initialize) so hosts can
/// defer it until a user gesture. Failures never reach the caller: a missing
/// asset falls back to a synthesized tone, a missing output silences the
/// session.
pub struct CueAudio {
    platform: Box<dyn AudioPlatform>,
    loader: Arc<dyn AssetLoader>,
    state: SessionState,
    output: Option<Box<dyn AudioOutput>>,
    assets: AssetTable,
    voices: Arc<AtomicUsize>,
    volumes: HashMap<Cue, f32>,
    ambient: Option<RunningAmbient>,
}

impl CueAudio {
    pub fn new(platform: Box<dyn AudioPlatform>, loader: Arc<dyn AssetLoader>) -> Self {
        Self {
            platform,
            loader,
            state: SessionState::Uninitialized,
            output: None,
            assets: Arc::new(Mutex::new(HashMap::new())),
            voices: Arc::new(AtomicUsize::new(0)),
            volumes: Cue::ALL.iter().map(|cue| (*cue, cue.conventional_volume())).collect(),
            ambient: None,
        }
    }

    /// rodio output on the configured device, assets from the configured root.
    pub fn from_config(config: &AudioConfig) -> Self {
        let platform = RodioPlatform::new(config.output_device_name.clone());
        let loader = DirectoryAssets::with_extensions(&config.asset_root, config.asset_extensions.clone());

        let mut audio = Self::new(Box::new(platform), Arc::new(loader));
        for cue in Cue::ALL {
            audio.set_volume(cue, config.volume_for(cue));
        }
        audio
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// Voices currently scheduled on the output.
    pub fn active_voices(&self) -> usize {
        self.voices.load(Ordering::SeqCst)
    }

    /// Volume used by the `play_tick`/`play_snap`/`play_ambient` wrappers.
    pub fn volume(&self, cue: Cue) -> f32 {
        self.volumes.get(&cue).copied().unwrap_or_else(|| cue.conventional_volume())
    }

    pub fn set_volume(&mut self, cue: Cue, volume: f32) {
        self.volumes.insert(cue, volume);
    }

    /// Opens the output and starts loading assets in the background.
    ///
    /// Only the first call does anything; later calls return an empty
    /// [`AssetLoad`] and never open a second output, even after a failure.
    pub fn initialize(&mut self) -> AssetLoad {
        if self.state != SessionState::Uninitialized {
            log::debug!("Cue audio already initialized ({:?}), ignoring", self.state);
            return AssetLoad::default();
        }

        match self.platform.open() {
            Ok(output) => {
                self.output = Some(output);
                self.state = SessionState::Ready;
                log::info!("Cue audio ready, loading sound assets");
                self.spawn_asset_loads()
            }
            Err(e) => {
                self.state = SessionState::Disabled;
                log::error!("Cue audio disabled for this session: {}", e);
                AssetLoad::default()
            }
        }
    }

    fn spawn_asset_loads(&self) -> AssetLoad {
        let mut loaders = Vec::with_capacity(Cue::ALL.len());

        for cue in Cue::ALL {
            let loader = Arc::clone(&self.loader);
            let assets = Arc::clone(&self.assets);

            let spawned = thread::Builder::new()
                .name(format!("cue-asset-{}", cue))
                .spawn(move || match loader.fetch(cue) {
                    Ok(asset) => {
                        log::info!("Bound sound asset for '{}' ({:.2}s)", cue, asset.duration().as_secs_f32());
                        match assets.lock() {
                            Ok(mut table) => {
                                table.entry(cue).or_insert(asset);
                            }
                            Err(e) => log::warn!("Asset table unavailable, '{}' stays synthesized: {}", cue, e),
                        }
                    }
                    Err(e) => {
                        log::warn!("Sound asset for '{}' unavailable, using synthesized tone: {}", cue, e);
                    }
                });

            match spawned {
                Ok(handle) => loaders.push((cue, handle)),
                Err(e) => log::warn!("Failed to start asset loader for '{}': {}", cue, e),
            }
        }

        AssetLoad { loaders }
    }

    /// What the next `play` of `cue` at `volume` would do. Consulted on
    /// every call, so a cue switches to its asset as soon as it loads.
    pub fn binding(&self, cue: Cue, volume: f32) -> CueBinding {
        let bound = self
            .assets
            .lock()
            .ok()
            .and_then(|table| table.get(&cue).cloned());

        match bound {
            Some(asset) => CueBinding::Bound(asset),
            None => CueBinding::Synthesized(cue.tone(volume)),
        }
    }

    /// Plays a cue by name. Unknown names are ignored.
    pub fn play(&self, name: &str, volume: f32) {
        match name.parse::<Cue>() {
            Ok(cue) => self.play_cue(cue, volume),
            Err(e) => log::debug!("Ignoring playback request: {}", e),
        }
    }

    pub fn play_cue(&self, cue: Cue, volume: f32) {
        let Some(output) = self.ready_output() else {
            log::debug!("Cue audio {:?}, skipping '{}'", self.state, cue);
            return;
        };

        let voice = VoiceGuard::acquire(&self.voices);
        let result = match self.binding(cue, volume) {
            CueBinding::Bound(asset) => {
                log::debug!("Playing '{}' from asset at volume {:.2}", cue, volume);
                output.play_asset(&asset, volume, voice)
            }
            CueBinding::Synthesized(tone) => {
                log::debug!("Playing '{}' as {:.0} Hz tone at volume {:.2}", cue, tone.frequency_hz, tone.volume);
                output.play_tone(tone, voice)
            }
        };

        if let Err(e) = result {
            log::warn!("Failed to play '{}': {}", cue, e);
        }
    }

    pub fn play_tick(&self) {
        self.play_cue(Cue::Tick, self.volume(Cue::Tick));
    }

    pub fn play_snap(&self) {
        self.play_cue(Cue::Snap, self.volume(Cue::Snap));
    }

    pub fn play_ambient(&self) {
        self.play_cue(Cue::Ambient, self.volume(Cue::Ambient));
    }

    /// Starts the continuous ambient bed: the ambient asset on repeat if
    /// bound, otherwise a synthesized hum until the asset arrives.
    pub fn start_ambient(&mut self) {
        if self.ambient.is_some() {
            log::debug!("Ambient loop already running");
            self.refresh_ambient();
            return;
        }
        self.ambient = self.open_ambient();
    }

    /// Swaps a running hum for the ambient asset once that asset is bound.
    /// Returns true if the loop was swapped.
    pub fn refresh_ambient(&mut self) -> bool {
        let hum_running = matches!(self.ambient, Some(RunningAmbient { from_asset: false, .. }));
        if !hum_running || !self.assets_bound(Cue::Ambient) {
            return false;
        }

        log::info!("Ambient asset bound, replacing synthesized hum");
        self.stop_ambient();
        self.ambient = self.open_ambient();
        true
    }

    fn open_ambient(&self) -> Option<RunningAmbient> {
        let Some(output) = self.ready_output() else {
            log::debug!("Cue audio {:?}, not starting ambient loop", self.state);
            return None;
        };

        let volume = self.volume(Cue::Ambient);
        let (bed, from_asset) = match self.binding(Cue::Ambient, volume) {
            CueBinding::Bound(asset) => (AmbientBed::Asset { asset, volume }, true),
            CueBinding::Synthesized(_) => (AmbientBed::Hum { volume }, false),
        };

        match output.start_loop(bed) {
            Ok(handle) => {
                log::info!("Ambient loop started ({})", if from_asset { "asset" } else { "hum" });
                Some(RunningAmbient { handle, from_asset })
            }
            Err(e) => {
                log::warn!("Failed to start ambient loop: {}", e);
                None
            }
        }
    }

    fn assets_bound(&self, cue: Cue) -> bool {
        self.assets.lock().map(|table| table.contains_key(&cue)).unwrap_or(false)
    }

    pub fn stop_ambient(&mut self) {
        if let Some(ambient) = self.ambient.take() {
            ambient.handle.stop();
            log::info!("Ambient loop stopped");
        }
    }

    pub fn ambient_running(&self) -> bool {
        self.ambient.is_some()
    }

    fn ready_output(&self) -> Option<&dyn AudioOutput> {
        match self.state {
            SessionState::Ready => self.output.as_deref(),
            SessionState::Uninitialized | SessionState::Disabled => None,
        }
    }
}

impl Drop for CueAudio {
    fn drop(&mut self) {
        self.stop_ambient();
    }
}
