pub mod assets;
pub mod cue;
pub mod devices;
pub mod manager;
pub mod output;
pub mod sound_generator;
pub mod tone;

#[cfg(test)]
pub(crate) mod testing;

pub use assets::{AssetLoader, DirectoryAssets, NoAssets, SoundAsset};
pub use cue::Cue;
pub use devices::{list_output_devices, OutputDevice};
pub use manager::{AssetLoad, CueAudio, CueBinding, SessionState};
pub use output::{AudioOutput, AudioPlatform, RodioPlatform};
pub use sound_generator::render_cue_sounds;
pub use tone::ToneSpec;
