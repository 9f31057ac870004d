use clap::Parser;
use std::path::PathBuf;

/// Recursive content discovery on top of an external directory brute-forcer.
#[derive(Clone, Debug, Parser)]
#[command(name = "recursive-scan")]
#[command(
    about = "Scan a target, then rescan every discovered directory until nothing new turns up."
)]
pub struct Cli {
    /// Target to scan, e.g. http://10.10.10.112/
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Threads for each spawned scanner. Default: 20.
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Wordlist for each spawned scanner. Default: seclists common.txt.
    #[arg(long, short = 'w')]
    pub wordlist: Option<PathBuf>,

    /// Extensions passed to the scanner's -x option (comma-separated). Hits ending in one are not recursed into.
    #[arg(long, short = 'x')]
    pub extensions: Option<String>,

    /// Username for basic auth (dir mode only).
    #[arg(long, short = 'U')]
    pub user: Option<String>,

    /// Password for basic auth (dir mode only). Ignored without --user.
    #[arg(long, short = 'P')]
    pub password: Option<String>,

    /// Prompt for the basic-auth password when none was given or found in the environment.
    #[arg(long)]
    pub ask_password: bool,

    /// Proxy to use for requests [http(s)://host:port] (dir mode only).
    #[arg(long, short = 'p')]
    pub proxy: Option<String>,

    /// User-Agent string for the scanner.
    #[arg(long, short = 'a')]
    pub user_agent: Option<String>,

    /// Send scanner stderr to /dev/null.
    #[arg(long, short = 'd')]
    pub devnull: bool,

    /// Scanner binary name or path. Default: gobuster.
    #[arg(long)]
    pub scanner: Option<String>,

    /// Seconds with no active scans before the run is considered complete. Default: 3.
    #[arg(long, value_name = "SECS")]
    pub debounce: Option<u64>,

    /// Directory for the final report. Default: current directory.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Terminate running scanners on Ctrl+C instead of leaving them running.
    #[arg(long)]
    pub kill_on_interrupt: bool,

    /// Verbose output.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
