//! Mapping handlers: bidirectional, unidirectional and tap.

use crate::cli::{GlobalOpts, MapArgs, MapCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(args: MapArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::build_device_config(global)?;
    let device = cfg.login.address.clone();

    let summary = match args.command {
        MapCommand::Bidi { a, b } => {
            let a = util::qualify(&a, &device);
            let b = util::qualify(&b, &device);
            let summary = format!("mapped {a} <-> {b}");
            util::with_driver(cfg, move |driver| async move { driver.map_bidi(&a, &b).await })
                .await?;
            summary
        }

        MapCommand::Uni { source, dests } => {
            let source = util::qualify(&source, &device);
            let dests = util::qualify_all(&dests, &device);
            let summary = format!("mapped {source} -> {}", dests.join(", "));
            util::with_driver(cfg, move |driver| async move {
                driver.map_uni(&source, &dests).await
            })
            .await?;
            summary
        }

        MapCommand::Tap { source, dests } => {
            let source = util::qualify(&source, &device);
            let dests = util::qualify_all(&dests, &device);
            let summary = format!("tapped {source} -> {}", dests.join(", "));
            util::with_driver(cfg, move |driver| async move {
                driver.map_tap(&source, &dests).await
            })
            .await?;
            summary
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
