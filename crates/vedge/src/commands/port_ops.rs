//! Attribute, speed and state-id handlers.
//!
//! The device exposes none of these through its REST API, so they run
//! against an unconfigured driver and never open a session.

use vedge_core::{Driver, HttpConnector};

use crate::cli::{AttrArgs, AttrCommand, GlobalOpts, SpeedArgs};
use crate::error::CliError;
use crate::output;

fn offline_driver() -> Driver<HttpConnector> {
    Driver::new(HttpConnector::default())
}

pub async fn handle_attr(args: AttrArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let driver = offline_driver();
    match args.command {
        AttrCommand::Get { address, name } => {
            let value = driver.get_attribute_value(&address, &name).await?;
            let out = output::render_single(
                &global.output_format(),
                &value,
                ToString::to_string,
                ToString::to_string,
            )?;
            output::print_output(&out, global.quiet);
        }
        AttrCommand::Set {
            address,
            name,
            value,
        } => {
            driver.set_attribute_value(&address, &name, &value).await?;
        }
    }
    Ok(())
}

pub async fn handle_speed(args: SpeedArgs) -> Result<(), CliError> {
    offline_driver()
        .set_speed_manual(&args.source, &args.dest, &args.speed, &args.duplex)
        .await?;
    Ok(())
}

pub fn handle_state_id(global: &GlobalOpts) -> Result<(), CliError> {
    let state_id = offline_driver().state_id();
    let out = output::render_single(
        &global.output_format(),
        &state_id,
        ToString::to_string,
        ToString::to_string,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
