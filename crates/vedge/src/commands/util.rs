//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;

use vedge_core::{CoreError, DeviceConfig, Driver, HttpConnector};

use crate::error::CliError;

/// Run `f` against a driver with a scoped session on the configured device.
pub async fn with_driver<T, F, Fut>(config: DeviceConfig, f: F) -> Result<T, CliError>
where
    F: FnOnce(Driver<HttpConnector>) -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    let connector = HttpConnector::from_config(&config);
    Ok(Driver::oneshot(connector, config.login, f).await?)
}

/// Expand a `<blade>/<port>` shorthand into a full address on `device`.
/// Full addresses pass through untouched.
pub fn qualify(address: &str, device: &str) -> String {
    let address = address.trim();
    if address.matches('/').count() == 1 {
        format!("{}/{address}", device.trim_end_matches('/'))
    } else {
        address.to_owned()
    }
}

pub fn qualify_all(addresses: &[String], device: &str) -> Vec<String> {
    addresses.iter().map(|a| qualify(a, device)).collect()
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
