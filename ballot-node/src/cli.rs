use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Command line of one ballot process.
///
/// Every option is optional here; unset options fall back to the JSON
/// config (`--config`) and then to built-in defaults. `-h` selects the
/// hosts file, so help is only available as `--help`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "ballot-node",
    version,
    about = "Single-decree vote over a static set of proposers, acceptors and learners",
    disable_help_flag = true
)]
pub struct Args {
    /// Role registry file, one `peer:role1,role2` line per peer [default: hostsfile.txt]
    #[arg(short = 'h', long = "hosts", value_name = "PATH")]
    pub hosts: Option<PathBuf>,

    /// Seconds to wait, after the startup grace, before proposing
    #[arg(short = 't', long = "delay", value_name = "SECS")]
    pub delay: Option<u64>,

    /// Value to propose (a single character)
    #[arg(short = 'v', long = "value", value_name = "CHAR")]
    pub value: Option<char>,

    /// TCP port used to listen and to reach peers [default: 4950]
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Peer name of this process instead of the host name
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// JSON node config
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also write consensus events to this file
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}
