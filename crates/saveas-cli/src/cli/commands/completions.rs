//! `saveas completions` and `saveas man`.

use anyhow::Result;
use clap::Command;
use clap_complete::Shell;

pub fn run_completions(shell: Shell, cmd: &mut Command) {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, name, &mut std::io::stdout());
}

pub fn run_man(cmd: Command) -> Result<()> {
    clap_mangen::Man::new(cmd).render(&mut std::io::stdout())?;
    Ok(())
}
