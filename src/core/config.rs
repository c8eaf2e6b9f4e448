use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::audio::Cue;

fn default_true() -> bool {
    true
}

fn default_asset_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_asset_extensions() -> Vec<String> {
    vec!["mp3".to_string(), "wav".to_string()]
}

fn default_tick_volume() -> f32 {
    Cue::Tick.conventional_volume()
}

fn default_snap_volume() -> f32 {
    Cue::Snap.conventional_volume()
}

fn default_ambient_volume() -> f32 {
    Cue::Ambient.conventional_volume()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Assets are looked up as `<asset_root>/sounds/<cue>.<ext>`
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
    #[serde(default = "default_asset_extensions")]
    pub asset_extensions: Vec<String>,
    #[serde(default)]
    pub output_device_name: Option<String>,
    #[serde(default = "default_tick_volume")]
    pub tick_volume: f32,
    #[serde(default = "default_snap_volume")]
    pub snap_volume: f32,
    #[serde(default = "default_ambient_volume")]
    pub ambient_volume: f32,
    /// Start the looping ambient bed on the first gesture
    #[serde(default = "default_true")]
    pub ambient_loop: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            asset_root: default_asset_root(),
            asset_extensions: default_asset_extensions(),
            output_device_name: None,
            tick_volume: default_tick_volume(),
            snap_volume: default_snap_volume(),
            ambient_volume: default_ambient_volume(),
            ambient_loop: true,
        }
    }
}

impl AudioConfig {
    pub fn volume_for(&self, cue: Cue) -> f32 {
        match cue {
            Cue::Tick => self.tick_volume,
            Cue::Snap => self.snap_volume,
            Cue::Ambient => self.ambient_volume,
        }
    }

    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .map_err(|e| anyhow::anyhow!("Failed to read config file at {}: {}", config_path.display(), e))?;

            match serde_json::from_str::<Self>(&content) {
                Ok(config) => {
                    log::info!("Loaded existing config from {}", config_path.display());
                    Ok(config)
                }
                Err(e) => {
                    log::warn!("Config file exists but has issues ({}), creating new one with defaults", e);
                    let new_config = Self::default();
                    new_config.save_to(config_path)
                        .map_err(|save_err| anyhow::anyhow!("Failed to save new config: {}", save_err))?;
                    log::info!("Created new config file at {}", config_path.display());
                    Ok(new_config)
                }
            }
        } else {
            log::info!("No config file found, creating default config");
            let config = Self::default();
            config.save_to(config_path)
                .map_err(|e| anyhow::anyhow!("Failed to save default config: {}", e))?;
            log::info!("Created new config file at {}", config_path.display());
            Ok(config)
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gauge-cues")
            .join("config.json")
    }
}
