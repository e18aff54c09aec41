use std::path::PathBuf;

use clap::Parser;

/// Probe a Lightning node on a schedule and serve the report over HTTP
#[derive(Debug, Default, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/sitzprobe/config.toml)
    #[arg(short, long, env = "SITZPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// lightningd data directory
    #[arg(long, env = "SITZPROBE_LIGHTNING_DIR")]
    pub lightning_dir: Option<PathBuf>,

    /// RPC socket file, relative to the lightning directory
    #[arg(long, env = "SITZPROBE_RPC_FILE")]
    pub rpc_file: Option<PathBuf>,

    /// Interval to run sitzprobe on, in minutes
    #[arg(long = "sitzprobe-freq", env = "SITZPROBE_FREQ")]
    pub frequency: Option<String>,

    /// Amount to probe with, in millisatoshis
    #[arg(long = "sitzprobe-amt", env = "SITZPROBE_AMT")]
    pub amount: Option<String>,

    /// Address the report server binds to
    #[arg(long, env = "SITZPROBE_BIND")]
    pub bind: Option<String>,

    /// Port the report server listens on
    #[arg(short, long, env = "SITZPROBE_PORT")]
    pub port: Option<u16>,
}
