use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::{Path, PathBuf};

use crate::audio::cue::Cue;
use crate::audio::tone::{ToneSource, ToneSpec, VoiceGuard, SAMPLE_RATE};

/// Renders a synthesized tone, envelope included, to a 16-bit mono WAV file
pub fn render_tone_wav(output_path: &Path, tone: &ToneSpec) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(output_path, spec)
        .map_err(|e| {
            log::error!("Failed to create WAV writer for {}: {}", output_path.display(), e);
            anyhow::anyhow!("Failed to create WAV writer: {}", e)
        })?;

    for sample in ToneSource::with_sample_rate(*tone, SAMPLE_RATE, VoiceGuard::detached()) {
        let sample_value = (sample * i16::MAX as f32) as i16;

        writer.write_sample(sample_value)
            .map_err(|e| {
                log::error!("Failed to write tone sample: {}", e);
                anyhow::anyhow!("Failed to write sample: {}", e)
            })?;
    }

    writer.finalize()
        .map_err(|e| {
            log::error!("Failed to finalize WAV file {}: {}", output_path.display(), e);
            anyhow::anyhow!("Failed to finalize WAV file: {}", e)
        })?;

    log::debug!("Rendered {:.0} Hz tone to {}", tone.frequency_hz, output_path.display());
    Ok(())
}

/// Writes every cue's synthesized tone to `<root>/sounds/<cue>.wav`, giving
/// a directory the asset loader can bind from.
pub fn render_cue_sounds(root: &Path) -> anyhow::Result<PathBuf> {
    let sounds_dir = root.join("sounds");

    std::fs::create_dir_all(&sounds_dir)
        .map_err(|e| {
            log::error!("Failed to create sounds directory {}: {}", sounds_dir.display(), e);
            anyhow::anyhow!("Failed to create sounds directory: {}", e)
        })?;

    for cue in Cue::ALL {
        let path = sounds_dir.join(format!("{}.wav", cue));
        render_tone_wav(&path, &cue.tone(cue.conventional_volume()))?;
    }

    log::info!("Rendered cue sounds in: {}", sounds_dir.display());
    Ok(sounds_dir)
}
