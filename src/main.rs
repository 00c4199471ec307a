use std::io::{self, BufRead};

use clap::{Parser, Subcommand};

use tend::actions::enabled_actions;
use tend::config::Config;
use tend::gateway::TaskCli;
use tend::{hook, tlog, tlog_error, Result};

/// Tend - rule-engine hook for the task tracker
#[derive(Parser, Debug)]
#[command(name = "tend")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    TEND_DEBUG=1    Enable debug logging (alternative to --debug)")]
pub struct Cli {
    /// Enable debug logging (writes to ~/.tend/tend.log)
    #[arg(short = 'd', long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Hook entry points, matching the tracker's hook protocol
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Process a newly created task (one JSON line on stdin)
    OnAdd,

    /// Process a modification (original then modified JSON lines on stdin)
    OnModify,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tend::log::init_with_debug(cli.debug);

    let config = Config::load()?;
    let actions = enabled_actions(&config.disabled_actions);
    let gateway = TaskCli::new(config.effective_task_bin());
    tlog!(
        "tend starting: {:?}, {} actions enabled",
        cli.command,
        actions.len()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let (old_line, new_line) = match cli.command {
        Command::OnAdd => (None, next_line(&mut lines)?),
        Command::OnModify => {
            let old = next_line(&mut lines)?;
            let new = next_line(&mut lines)?;
            (old, new)
        }
    };

    let result = hook::run_hook(
        new_line.as_deref(),
        old_line.as_deref(),
        &actions,
        &gateway,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    if let Err(err) = &result {
        tlog_error!("run failed: {}", err);
    }
    result
}

fn next_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Option<String>> {
    match lines.next() {
        Some(line) => Ok(Some(line?)),
        None => Ok(None),
    }
}
