//! Command dispatch and handler modules.

mod check;
mod plan;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Plan {
            file,
            warn_on_missing,
            tree,
        } => plan::exec(&file, warn_on_missing, tree),
        Command::Check { file } => check::exec(&file),
    }
}
