//! Mapping removal handlers.

use crate::cli::{ClearArgs, ClearCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(args: ClearArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::build_device_config(global)?;
    let device = cfg.login.address.clone();

    let summary = match args.command {
        ClearCommand::All { addresses } => {
            let addresses = util::qualify_all(&addresses, &device);
            let listed = addresses.join(", ");
            if !util::confirm(
                &format!("Remove every mapping on {listed}?"),
                "clear all",
                global.yes,
            )? {
                return Ok(());
            }
            util::with_driver(cfg, move |driver| async move {
                driver.clear_all(&addresses).await
            })
            .await?;
            format!("cleared all mappings on {listed}")
        }

        ClearCommand::To { source, dests } => {
            let source = util::qualify(&source, &device);
            let dests = util::qualify_all(&dests, &device);
            let edge = format!("{source} -> {}", dests.join(", "));
            if !util::confirm(&format!("Remove mapping {edge}?"), "clear to", global.yes)? {
                return Ok(());
            }
            util::with_driver(cfg, move |driver| async move {
                driver.clear_to(&source, &dests).await
            })
            .await?;
            format!("cleared {edge}")
        }
    };

    if !global.quiet {
        eprintln!(
            "{}",
            output::success(&summary, output::should_color(&global.color_mode()))
        );
    }
    Ok(())
}
