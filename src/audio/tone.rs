use rodio::Source;
use std::f32::consts::PI;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const SAMPLE_RATE: u32 = 44100;

/// Linear attack length shared by every synthesized cue.
pub const ATTACK: Duration = Duration::from_millis(10);

/// Gain the exponential decay reaches at the end of a tone.
pub const DECAY_FLOOR: f32 = 0.001;

/// Partials of the synthesized ambient hum.
pub const HUM_PARTIALS_HZ: [f32; 2] = [60.0, 120.0];

/// A single synthesis request. Built per call, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub frequency_hz: f32,
    pub duration: Duration,
    /// Peak gain of the envelope, clamped to `0.0..=1.0`
    pub volume: f32,
}

impl ToneSpec {
    pub fn new(frequency_hz: f32, duration: Duration, volume: f32) -> Self {
        Self {
            frequency_hz,
            duration,
            volume: clamp_volume(volume),
        }
    }

    pub fn envelope(&self) -> Envelope {
        Envelope::new(self.volume, self.duration)
    }

    pub fn total_samples(&self, sample_rate: u32) -> usize {
        (self.duration.as_secs_f32() * sample_rate as f32) as usize
    }
}

pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Gain curve of a synthesized tone: a linear ramp from silence to `peak`
/// over [`ATTACK`], then an exponential ramp down to [`DECAY_FLOOR`] at `total`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    peak: f32,
    attack_secs: f32,
    total_secs: f32,
}

impl Envelope {
    pub fn new(peak: f32, total: Duration) -> Self {
        let total_secs = total.as_secs_f32();
        Self {
            peak,
            attack_secs: ATTACK.as_secs_f32().min(total_secs),
            total_secs,
        }
    }

    pub fn gain_at(&self, t: f32) -> f32 {
        if self.peak <= 0.0 || t <= 0.0 {
            return 0.0;
        }
        if t < self.attack_secs {
            return self.peak * t / self.attack_secs;
        }

        // A peak quieter than the floor just holds.
        let floor = DECAY_FLOOR.min(self.peak);
        let decay_secs = self.total_secs - self.attack_secs;
        if t >= self.total_secs || decay_secs <= 0.0 {
            return floor;
        }

        let progress = (t - self.attack_secs) / decay_secs;
        self.peak * (floor / self.peak).powf(progress)
    }
}

/// Counts a live voice for as long as it is held.
#[derive(Debug)]
pub struct VoiceGuard {
    counter: Option<Arc<AtomicUsize>>,
}

impl VoiceGuard {
    pub fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self {
            counter: Some(Arc::clone(counter)),
        }
    }

    /// A guard that tracks nothing, for offline rendering.
    pub fn detached() -> Self {
        Self { counter: None }
    }
}

impl Drop for VoiceGuard {
    fn drop(&mut self) {
        if let Some(counter) = self.counter.take() {
            counter.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// One synthesized sine voice. Each call to play builds its own, so
/// overlapping tones never share phase or envelope state. The voice is
/// released when the mixer drops the exhausted source.
pub struct ToneSource {
    spec: ToneSpec,
    envelope: Envelope,
    sample_rate: u32,
    sample_idx: usize,
    total_samples: usize,
    _voice: VoiceGuard,
}

impl ToneSource {
    pub fn new(spec: ToneSpec, voice: VoiceGuard) -> Self {
        Self::with_sample_rate(spec, SAMPLE_RATE, voice)
    }

    pub fn with_sample_rate(spec: ToneSpec, sample_rate: u32, voice: VoiceGuard) -> Self {
        Self {
            spec,
            envelope: spec.envelope(),
            sample_rate,
            sample_idx: 0,
            total_samples: spec.total_samples(sample_rate),
            _voice: voice,
        }
    }

    pub fn spec(&self) -> &ToneSpec {
        &self.spec
    }
}

impl Iterator for ToneSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.sample_idx >= self.total_samples {
            return None;
        }

        let t = self.sample_idx as f32 / self.sample_rate as f32;
        let sample = (2.0 * PI * self.spec.frequency_hz * t).sin() * self.envelope.gain_at(t);
        self.sample_idx += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_samples - self.sample_idx;
        (remaining, Some(remaining))
    }
}

impl Source for ToneSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples - self.sample_idx)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.spec.duration)
    }
}

/// Endless ambient hum used when no ambient asset is bound.
pub struct HumSource {
    volume: f32,
    sample_rate: u32,
    sample_idx: u64,
}

impl HumSource {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: clamp_volume(volume),
            sample_rate: SAMPLE_RATE,
            sample_idx: 0,
        }
    }
}

impl Iterator for HumSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        // Wrap once per second; every partial is a whole number of Hz.
        let idx = self.sample_idx % self.sample_rate as u64;
        let t = idx as f32 / self.sample_rate as f32;
        let fade_in = (self.sample_idx as f32 / self.sample_rate as f32 / ATTACK.as_secs_f32()).min(1.0);

        let mix: f32 = HUM_PARTIALS_HZ
            .iter()
            .map(|freq| (2.0 * PI * freq * t).sin())
            .sum::<f32>()
            / HUM_PARTIALS_HZ.len() as f32;

        self.sample_idx += 1;
        Some(mix * self.volume * fade_in)
    }
}

impl Source for HumSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}
