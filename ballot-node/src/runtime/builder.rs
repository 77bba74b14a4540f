use std::{net::SocketAddr, sync::Arc};

use tokio::task::JoinHandle;
use tracing::{info, warn};

use ballot_common::{NodeId, Result};
use ballot_consensus::{ConsensusEngine, RoleRegistry};
use ballot_p2p::{peer_book::PeerBook, tcp, TcpTransport};

use crate::{config::NodeConfig, runtime::proposal_driver::ProposalDriver};

pub struct BallotRuntime {
    pub id: NodeId,
    pub engine: Arc<ConsensusEngine>,
    pub registry: Arc<RoleRegistry>,
    pub local_addr: SocketAddr,
    listener: JoinHandle<()>,
}

impl BallotRuntime {
    pub fn proposal_driver(&self, config: &NodeConfig) -> ProposalDriver {
        ProposalDriver::new(
            Arc::clone(&self.engine),
            config.startup_grace() + config.propose_delay(),
            config.value,
        )
    }

    pub fn shutdown(self) {
        self.listener.abort();
    }
}

/// Loads the registry, binds the listener and wires the engine to TCP.
///
/// Every failure here is fatal for the process.
pub async fn build_runtime(config: &NodeConfig) -> Result<BallotRuntime> {
    let id = config.resolve_name()?;
    let registry = Arc::new(RoleRegistry::load_from_file(&config.hosts_path)?);
    info!(
        "📒 Registry {} lists {} peers, {} acceptors",
        config.hosts_path.display(),
        registry.len(),
        registry.acceptor_count()
    );
    if !registry.contains(&id) {
        warn!("⚠️ This host ({}) is not in {}", id, config.hosts_path.display());
    }

    let p2p = config.p2p_config();
    let peers = PeerBook::resolve(registry.peers(), p2p.port).await;

    let listener = tcp::bind(&p2p).await?;
    let local_addr = listener.local_addr()?;

    let transport = Arc::new(TcpTransport::new(p2p.port));
    let engine = Arc::new(ConsensusEngine::new(id.clone(), Arc::clone(&registry), transport));
    info!("🔌 {} listening on {} with roles {:?}", id, local_addr, engine.roles());
    let listener = tcp::spawn_listener(listener, engine.clone(), Arc::new(peers));

    Ok(BallotRuntime {
        id,
        engine,
        registry,
        local_addr,
        listener,
    })
}
