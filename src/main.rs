//! `scp` — Super Check Partial (SCP/XSCP) dictionary builder for amateur
//! radio contest logs. Run `scp --help` for usage.

use anyhow::{Context, Result};
use clap::Parser;
use scp::config::RunConfig;
use scp::{contest, output, scheduler};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.parse()?))
        .init();

    let contests = contest::resolve_contests(&cli.dir, cli.start.as_deref(), cli.hrs)
        .context("failed to resolve contest parameters")?;

    let config = RunConfig {
        verbose: cli.verbose,
        cutoff_limit: cli.cutoff,
        parallel: cli.parallel,
        traced_call: cli.trace.map(|c| c.to_ascii_uppercase()),
        tl_limit: cli.tl,
        xscp: cli.xscp,
        xpc: cli.xpc,
        display_bad_qsos: cli.bad_qsos,
    };

    let counts = scheduler::run_contests(&contests, &config)
        .context("contest scheduling failed")?;
    let counts = output::apply_xpc(&counts, config.xpc);

    let rendered = if config.xscp {
        output::render_xscp(&counts)
    } else {
        output::render_scp(&counts)
    };
    print!("{}", rendered);

    Ok(())
}
