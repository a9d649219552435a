//! `wpr completions`: print a completion script for the `wpr` binary.

use clap::Args;
use clap_complete::{Shell, generate};
use std::io;

/// Shell to generate completions for (bash, zsh, fish, elvish, powershell).
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell whose completion script is printed to stdout.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for every `wpr` command and global option.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> anyhow::Result<()> {
    let name = command.get_name().to_string();
    generate(shell, command, name, &mut io::stdout().lock());
    Ok(())
}
