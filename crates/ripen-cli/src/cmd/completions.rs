use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `ripen completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Print the completion script for `args.shell`, named after `command`'s binary.
pub fn run_completions(args: &CompletionsArgs, command: &mut clap::Command) -> Result<()> {
    write_completions(args.shell, command, &mut io::stdout().lock())
}

fn write_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) -> Result<()> {
    let bin = command.get_name().to_string();
    generate(shell, command, bin, out);
    out.flush().context("flush completion script")
}
