//! Command dispatch: bridges CLI args -> driver operations -> output formatting.

pub mod clear;
pub mod config_cmd;
pub mod discover;
pub mod map;
pub mod port_ops;
pub mod util;

use clap::CommandFactory;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Discover => discover::handle(global).await,
        Command::Map(args) => map::handle(args, global).await,
        Command::Clear(args) => clear::handle(args, global).await,
        Command::Attr(args) => port_ops::handle_attr(args, global).await,
        Command::Speed(args) => port_ops::handle_speed(args).await,
        Command::StateId => port_ops::handle_state_id(global),
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "vedge", &mut std::io::stdout());
            Ok(())
        }
    }
}
