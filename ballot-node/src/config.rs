use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::info;

use ballot_common::{BallotError, NodeId, Result};
use ballot_p2p::{config::DEFAULT_PORT, P2pConfig};

use crate::cli::Args;

const HOSTNAME_FILE: &str = "/etc/hostname";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub hosts_path: PathBuf,
    pub listen_addr: String,
    pub port: u16,
    pub propose_delay_secs: u64,
    /// Warm-up before proposing so the other processes can come online.
    pub startup_grace_secs: u64,
    pub value: Option<char>,
    pub name: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            hosts_path: PathBuf::from("hostsfile.txt"),
            listen_addr: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            propose_delay_secs: 0,
            startup_grace_secs: 2,
            value: None,
            name: None,
            log_file: None,
        }
    }
}

impl NodeConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| BallotError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        serde_json::from_str(&json)
            .map_err(|e| BallotError::Config(format!("cannot parse {}: {}", path.display(), e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BallotError::Config(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }

    /// File named by `--config` (or defaults), then command line overrides.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => {
                info!("📝 Loading node config from {}", path.display());
                Self::load_from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_args(args);
        Ok(config)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(hosts) = &args.hosts {
            self.hosts_path = hosts.clone();
        }
        if let Some(delay) = args.delay {
            self.propose_delay_secs = delay;
        }
        if let Some(value) = args.value {
            self.value = Some(value);
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if let Some(name) = &args.name {
            self.name = Some(name.clone());
        }
        if let Some(log_file) = &args.log_file {
            self.log_file = Some(log_file.clone());
        }
    }

    pub fn p2p_config(&self) -> P2pConfig {
        P2pConfig {
            listen_addr: self.listen_addr.clone(),
            port: self.port,
        }
    }

    pub fn startup_grace(&self) -> Duration {
        Duration::from_secs(self.startup_grace_secs)
    }

    pub fn propose_delay(&self) -> Duration {
        Duration::from_secs(self.propose_delay_secs)
    }

    /// Peer name of this process: configured name, `$HOSTNAME`, then
    /// `/etc/hostname`. It must match a registry line exactly.
    pub fn resolve_name(&self) -> Result<NodeId> {
        pick_name(
            self.name.as_deref(),
            std::env::var("HOSTNAME").ok().as_deref(),
            fs::read_to_string(HOSTNAME_FILE).ok().as_deref(),
        )
    }
}

fn pick_name(configured: Option<&str>, env: Option<&str>, file: Option<&str>) -> Result<NodeId> {
    [configured, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(NodeId::from)
        .ok_or_else(|| {
            BallotError::Config("cannot determine this host's name; pass --name".to_string())
        })
}
