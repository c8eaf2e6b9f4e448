use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use gauge_cues::audio::{list_output_devices, render_cue_sounds, CueAudio};
use gauge_cues::core::AudioConfig;
use gauge_cues::interaction::{CueDispatcher, Interaction, InteractionBus};

#[derive(Parser, Debug)]
#[command(name = "gauge-cues", version, about = "Cue audio for the gauge cluster dashboard")]
struct Cli {
    /// Config file to use instead of the per-user one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a scripted hover/click sequence through the cue pipeline
    Demo {
        #[arg(long, default_value_t = 3)]
        passes: u32,
    },
    /// Write every cue's synthesized tone to <out>/sounds/<cue>.wav
    Render {
        #[arg(long)]
        out: PathBuf,
    },
    /// List audio output devices
    Devices,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AudioConfig::load_from(path)?,
        None => AudioConfig::load()?,
    };

    match cli.command {
        Command::Demo { passes } => run_demo(&config, passes),
        Command::Render { out } => {
            let sounds_dir = render_cue_sounds(&out)?;
            println!("Rendered cue sounds to {}", sounds_dir.display());
            Ok(())
        }
        Command::Devices => {
            for device in list_output_devices()? {
                let marker = if device.is_default { " (default)" } else { "" };
                println!("{}{}", device.name, marker);
            }
            Ok(())
        }
    }
}

fn run_demo(config: &AudioConfig, passes: u32) -> anyhow::Result<()> {
    if !config.enabled {
        log::info!("Cue audio is disabled in config, nothing to play");
        return Ok(());
    }

    let mut audio = CueAudio::from_config(config);
    let (bus, receiver) = InteractionBus::new();
    let mut dispatcher = CueDispatcher::new(receiver, config.ambient_loop);

    let script = [
        (Interaction::PointerEnter, Duration::from_millis(250)),
        (Interaction::Click, Duration::from_millis(600)),
        (Interaction::PointerLeave, Duration::from_millis(150)),
    ];

    bus.emit(Interaction::FirstGesture);
    dispatcher.pump(&mut audio);
    thread::sleep(Duration::from_millis(500));

    for pass in 0..passes {
        log::debug!("Demo pass {}", pass + 1);
        for (interaction, pause) in script {
            bus.emit(interaction);
            dispatcher.pump(&mut audio);
            thread::sleep(pause);
        }
    }

    audio.stop_ambient();

    // Let in-flight voices finish their envelopes before the stream closes.
    let deadline = Instant::now() + Duration::from_secs(3);
    while audio.active_voices() > 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(20));
    }

    log::info!("Demo finished in state {:?}", audio.state());
    Ok(())
}
