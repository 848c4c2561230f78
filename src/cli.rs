//! CLI definitions for `scp` (spec §6). The front-end is deliberately a
//! thin shell: option parsing only, no domain logic.

use clap::Parser;

#[derive(Parser)]
#[clap(
    name = "scp",
    version,
    about = "Super Check Partial (SCP/XSCP) dictionary builder for amateur radio contest logs",
    long_about = None
)]
pub struct Cli {
    /// Log directory, or `@path` naming a contest list file
    #[clap(long = "dir")]
    pub dir: String,

    /// Contest start, `YYYY-MM-DD[THH[:MM[:SS]]]` (required unless `-dir` is an @file)
    #[clap(long = "start")]
    pub start: Option<String>,

    /// Contest duration in hours (required unless `-dir` is an @file)
    #[clap(long = "hrs")]
    pub hrs: Option<u32>,

    /// Verbose progress reporting
    #[clap(long, short = 'v')]
    pub verbose: bool,

    /// Cutoff: a call's surviving count must exceed this to stay in the dictionary
    #[clap(long = "cutoff", short = 'l', default_value_t = scp::config::DEFAULT_CUTOFF_LIMIT)]
    pub cutoff: u32,

    /// Number of contests to process concurrently
    #[clap(long = "parallel", short = 'p', default_value_t = scp::config::DEFAULT_PARALLEL)]
    pub parallel: usize,

    /// Trace one callsign through every Band Pruner pass
    #[clap(long = "trace")]
    pub trace: Option<String>,

    /// Minimum QSO count for a sender to be automatically added to `entrants`
    #[clap(long = "tl", default_value_t = scp::config::DEFAULT_TL_LIMIT)]
    pub tl: usize,

    /// Emit XSCP (`call count` per line) instead of plain SCP
    #[clap(long = "xscp", short = 'x')]
    pub xscp: bool,

    /// Retain only the top n% of call-count mass
    #[clap(long = "xpc", default_value_t = scp::config::DEFAULT_XPC)]
    pub xpc: u32,

    /// Echo rejected QSO lines to the diagnostics stream
    #[clap(long = "bad-qsos", short = 'i')]
    pub bad_qsos: bool,
}
