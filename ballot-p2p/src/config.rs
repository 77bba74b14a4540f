use serde::{Deserialize, Serialize};

/// Port every ballot process listens on and dials.
pub const DEFAULT_PORT: u16 = 4950;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct P2pConfig {
    /// Interface the listener binds to, e.g. `0.0.0.0`.
    pub listen_addr: String,
    /// Shared by the local listener and every remote peer.
    pub port: u16,
}

impl Default for P2pConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl P2pConfig {
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.listen_addr, self.port)
    }
}
