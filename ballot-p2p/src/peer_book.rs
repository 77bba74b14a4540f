use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
};

use tracing::{debug, warn};

use ballot_common::NodeId;

/// Reverse lookup from a connection's remote address to the peer name used
/// in the registry.
///
/// Inbound connections only carry an address, so every known peer is
/// resolved once at startup. Unknown addresses fall back to the bare IP.
#[derive(Debug, Default, Clone)]
pub struct PeerBook {
    by_ip: HashMap<IpAddr, NodeId>,
}

impl PeerBook {
    pub fn new() -> Self {
        Self {
            by_ip: HashMap::new(),
        }
    }

    /// Resolves every peer name through DNS / `/etc/hosts`.
    ///
    /// A peer that cannot be resolved is logged and skipped; it will show up
    /// under its IP address instead of its name.
    pub async fn resolve<'a, I>(peers: I, port: u16) -> Self
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        let mut book = Self::new();
        for peer in peers {
            match tokio::net::lookup_host((peer.as_str(), port)).await {
                Ok(addrs) => {
                    for addr in addrs {
                        debug!("peer {} resolves to {}", peer, addr.ip());
                        book.insert(addr.ip(), peer.clone());
                    }
                }
                Err(e) => warn!("could not resolve peer {}: {}", peer, e),
            }
        }
        book
    }

    pub fn insert(&mut self, ip: IpAddr, peer: NodeId) {
        // First name wins when several peers share an address.
        self.by_ip.entry(ip).or_insert(peer);
    }

    pub fn name_for(&self, addr: &SocketAddr) -> NodeId {
        self.by_ip
            .get(&addr.ip())
            .cloned()
            .unwrap_or_else(|| NodeId(addr.ip().to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_ip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_ip.is_empty()
    }
}
