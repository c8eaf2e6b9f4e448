use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::audio::CueAudio;
use crate::interaction::Interaction;

/// Drains interaction events on the UI thread and turns them into cues.
pub struct CueDispatcher {
    receiver: broadcast::Receiver<Interaction>,
    ambient_loop: bool,
}

impl CueDispatcher {
    /// With `ambient_loop` the first gesture starts the looping ambient bed,
    /// otherwise it plays the ambient cue once.
    pub fn new(receiver: broadcast::Receiver<Interaction>, ambient_loop: bool) -> Self {
        Self { receiver, ambient_loop }
    }

    /// Handles every queued event and returns how many were handled. Also
    /// moves a hum ambient bed onto the ambient asset once it has loaded.
    pub fn pump(&mut self, audio: &mut CueAudio) -> usize {
        let mut handled = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(interaction) => {
                    self.handle(interaction, audio);
                    handled += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    log::warn!("Dropped {} interaction events", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        audio.refresh_ambient();
        handled
    }

    pub fn handle(&self, interaction: Interaction, audio: &mut CueAudio) {
        log::debug!("Handling {:?}", interaction);
        if interaction == Interaction::FirstGesture {
            // Loads finish in the background; cues synthesize until then.
            drop(audio.initialize());
            if self.ambient_loop {
                audio.start_ambient();
                return;
            }
        }

        if let Some(cue) = interaction.cue() {
            audio.play_cue(cue, audio.volume(cue));
        }
    }
}
