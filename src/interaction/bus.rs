use tokio::sync::broadcast;

use crate::interaction::Interaction;

/// Fan-out channel from UI event handlers to whoever plays cues.
pub struct InteractionBus {
    event_sender: broadcast::Sender<Interaction>,
}

impl InteractionBus {
    pub fn new() -> (Self, broadcast::Receiver<Interaction>) {
        let (event_sender, event_receiver) = broadcast::channel(32);
        (InteractionBus { event_sender }, event_receiver)
    }

    pub fn emit(&self, interaction: Interaction) {
        if self.event_sender.send(interaction).is_err() {
            log::debug!("No listeners for {:?}", interaction);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Interaction> {
        self.event_sender.subscribe()
    }
}
