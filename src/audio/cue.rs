use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::audio::tone::ToneSpec;
use crate::core::error::AudioError;

/// The named feedback events the dashboard can sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Short click when the pointer enters a gauge or control
    Tick,
    /// Mechanical click on activation
    Snap,
    /// Low hum bed started after the first gesture
    Ambient,
}

impl Cue {
    pub const ALL: [Cue; 3] = [Cue::Tick, Cue::Snap, Cue::Ambient];

    pub fn as_str(self) -> &'static str {
        match self {
            Cue::Tick => "tick",
            Cue::Snap => "snap",
            Cue::Ambient => "ambient",
        }
    }

    /// Oscillator frequency used when no asset is bound.
    pub fn frequency_hz(self) -> f32 {
        match self {
            Cue::Tick => 1000.0,
            Cue::Snap => 600.0,
            Cue::Ambient => 60.0,
        }
    }

    /// Tone length used when no asset is bound.
    pub fn tone_duration(self) -> Duration {
        match self {
            Cue::Tick => Duration::from_millis(50),
            Cue::Snap => Duration::from_millis(100),
            Cue::Ambient => Duration::from_secs(2),
        }
    }

    /// Volume used by the `play_tick`/`play_snap`/`play_ambient` wrappers.
    pub fn conventional_volume(self) -> f32 {
        match self {
            Cue::Tick => 0.2,
            Cue::Snap => 0.4,
            Cue::Ambient => 0.1,
        }
    }

    pub fn tone(self, volume: f32) -> ToneSpec {
        ToneSpec::new(self.frequency_hz(), self.tone_duration(), volume)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cue {
    type Err = AudioError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "tick" => Ok(Cue::Tick),
            "snap" => Ok(Cue::Snap),
            "ambient" => Ok(Cue::Ambient),
            other => Err(AudioError::UnknownCue(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_names_round_trip() {
        for cue in Cue::ALL {
            assert_eq!(cue.as_str().parse::<Cue>().unwrap(), cue);
            assert_eq!(cue.to_string(), cue.as_str());
        }
    }

    #[test]
    fn test_unknown_cue_is_rejected() {
        match "explode".parse::<Cue>() {
            Err(AudioError::UnknownCue(name)) => assert_eq!(name, "explode"),
            other => panic!("Unexpected parse result: {:?}", other),
        }
        // Names are case sensitive
        assert!("Tick".parse::<Cue>().is_err());
    }

    #[test]
    fn test_tone_parameters() {
        let tick = Cue::Tick.tone(0.5);
        assert_eq!(tick.frequency_hz, 1000.0);
        assert_eq!(tick.duration, Duration::from_millis(50));
        assert_eq!(tick.volume, 0.5);

        let snap = Cue::Snap.tone(0.4);
        assert_eq!(snap.frequency_hz, 600.0);
        assert_eq!(snap.duration, Duration::from_millis(100));

        let ambient = Cue::Ambient.tone(0.1);
        assert_eq!(ambient.frequency_hz, 60.0);
        assert_eq!(ambient.duration, Duration::from_secs(2));
    }

    #[test]
    fn test_conventional_volumes() {
        assert_eq!(Cue::Tick.conventional_volume(), 0.2);
        assert_eq!(Cue::Snap.conventional_volume(), 0.4);
        assert_eq!(Cue::Ambient.conventional_volume(), 0.1);
    }
}
