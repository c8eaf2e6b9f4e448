//! Cue audio for the gauge cluster dashboard.
//!
//! [`audio::CueAudio`] plays the `tick`, `snap` and `ambient` cues from
//! pre-recorded assets when they load and from synthesized sine tones when
//! they do not. [`interaction`] maps pointer events from the UI layer onto
//! those cues.

pub mod audio;
pub mod core;
pub mod interaction;
