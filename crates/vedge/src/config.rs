//! CLI configuration: thin wrapper around `vedge_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag overrides
//! (--device, --username, --port, --insecure, --timeout, --output, --color).

use clap::ValueEnum;
use vedge_core::DeviceConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use vedge_config::{Config, Profile, config_path, load_config_or_default};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// The effective profile: the stored one (if any) with flag overrides
/// applied on top. Without a stored profile, `--device` alone is enough.
pub fn effective_profile(
    global: &GlobalOpts,
    config: &Config,
) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);

    let mut profile = match config.profiles.get(&name) {
        Some(stored) => stored.clone(),
        None if global.device.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            let mut available: Vec<_> = config.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::Validation {
                field: "profile".into(),
                reason: format!(
                    "'{name}' is not defined (available: {})",
                    if available.is_empty() {
                        "none".to_owned()
                    } else {
                        available.join(", ")
                    }
                ),
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(ref device) = global.device {
        profile.address.clone_from(device);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.port.is_some() {
        profile.port = global.port;
    }
    if global.insecure || (profile.insecure.is_none() && config.defaults.insecure) {
        profile.insecure = Some(true);
    }
    profile.timeout = global
        .timeout
        .or(profile.timeout)
        .or(Some(config.defaults.timeout));

    Ok((name, profile))
}

/// Fill `--output` / `--color` from `[defaults]` when no flag was given.
///
/// Unknown values in the config file are ignored with a warning.
pub fn apply_display_defaults(global: &mut GlobalOpts, config: &Config) {
    if global.output.is_none() {
        global.output = parse_default::<OutputFormat>("output", &config.defaults.output);
    }
    if global.color.is_none() {
        global.color = parse_default::<ColorMode>("color", &config.defaults.color);
    }
}

fn parse_default<T: ValueEnum>(key: &str, value: &str) -> Option<T> {
    T::from_str(value, true)
        .map_err(|_| tracing::warn!(key, value, "ignoring unknown value in [defaults]"))
        .ok()
}

/// Build a `DeviceConfig` from the config file, profile, and CLI overrides.
pub fn build_device_config(global: &GlobalOpts) -> Result<DeviceConfig, CliError> {
    let cfg = load_config_or_default();
    let (name, profile) = effective_profile(global, &cfg)?;
    tracing::debug!(profile = %name, address = %profile.address, "resolved device profile");
    Ok(vedge_config::profile_to_device_config(&profile, &name)?)
}
