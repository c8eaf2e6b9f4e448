use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host};

use crate::core::error::AudioError;

/// An output device as shown by the `devices` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDevice {
    pub name: String,
    pub is_default: bool,
}

/// Every named output device on the default host.
pub fn list_output_devices() -> Result<Vec<OutputDevice>, AudioError> {
    let host = cpal::default_host();
    let default_name = host.default_output_device().and_then(|device| device.name().ok());
    let names = named_output_devices(&host)?.into_iter().map(|(name, _)| name).collect();

    Ok(mark_default(names, default_name.as_deref()))
}

/// The output device named `preferred`, or the host default when no name is
/// configured. A configured name that matches nothing is an error.
pub fn find_output_device(preferred: Option<&str>) -> Result<Device, AudioError> {
    let host = cpal::default_host();
    let named = match preferred {
        Some(_) => named_output_devices(&host)?,
        None => Vec::new(),
    };

    pick_device(named, preferred, || host.default_output_device())
}

fn named_output_devices(host: &Host) -> Result<Vec<(String, Device)>, AudioError> {
    let devices = host
        .output_devices()
        .map_err(|e| AudioError::PlatformUnavailable(format!("cannot enumerate output devices: {}", e)))?;

    let named: Vec<(String, Device)> = devices
        .filter_map(|device| match device.name() {
            Ok(name) => Some((name, device)),
            Err(e) => {
                log::warn!("Skipping output device without a name: {}", e);
                None
            }
        })
        .collect();

    log::debug!("Found {} named output devices", named.len());
    Ok(named)
}

fn mark_default(names: Vec<String>, default_name: Option<&str>) -> Vec<OutputDevice> {
    names
        .into_iter()
        .map(|name| OutputDevice {
            is_default: default_name == Some(name.as_str()),
            name,
        })
        .collect()
}

fn pick_device<D>(
    named: Vec<(String, D)>,
    preferred: Option<&str>,
    default: impl FnOnce() -> Option<D>,
) -> Result<D, AudioError> {
    match preferred {
        Some(wanted) => named
            .into_iter()
            .find(|(name, _)| name == wanted)
            .map(|(_, device)| device)
            .ok_or_else(|| AudioError::DeviceNotFound(wanted.to_string())),
        None => default().ok_or_else(|| AudioError::PlatformUnavailable("no default output device".to_string())),
    }
}
