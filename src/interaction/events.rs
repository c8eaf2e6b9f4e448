use crate::audio::Cue;

/// Discrete pointer events forwarded by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// First click or touch on the page; audio may start after this
    FirstGesture,
    PointerEnter,
    PointerLeave,
    Click,
}

impl Interaction {
    /// The cue this event sounds, if any.
    pub fn cue(self) -> Option<Cue> {
        match self {
            Interaction::FirstGesture => Some(Cue::Ambient),
            Interaction::PointerEnter => Some(Cue::Tick),
            Interaction::Click => Some(Cue::Snap),
            Interaction::PointerLeave => None,
        }
    }
}
