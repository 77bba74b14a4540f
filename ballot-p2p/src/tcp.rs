//! TCP transport: one proposal per connection, closed after the write.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};
use tracing::{debug, error, warn};

use ballot_common::{NodeId, Proposal};

use crate::{
    codec,
    config::P2pConfig,
    error::P2pError,
    peer_book::PeerBook,
    ports::{MessageHandler, Transport},
};

/// Upper bound on a single inbound record.
pub const MAX_MESSAGE_BYTES: u64 = 1024;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct TcpTransport {
    port: u16,
}

impl TcpTransport {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&self, peer: &NodeId, proposal: &Proposal) -> Result<(), P2pError> {
        let mut stream = TcpStream::connect((peer.as_str(), self.port))
            .await
            .map_err(|source| P2pError::Connect {
                peer: peer.clone(),
                source,
            })?;

        let payload = codec::encode(proposal);
        stream
            .write_all(&payload)
            .await
            .map_err(|source| P2pError::Send {
                peer: peer.clone(),
                source,
            })?;

        // Closing the write half is what tells the receiver the record is complete.
        stream.shutdown().await.map_err(|source| P2pError::Send {
            peer: peer.clone(),
            source,
        })?;

        debug!("sent {} to {}:{}", proposal, peer, self.port);
        Ok(())
    }
}

pub async fn bind(config: &P2pConfig) -> Result<TcpListener, P2pError> {
    let addr = config.listen_socket();
    TcpListener::bind(&addr)
        .await
        .map_err(|source| P2pError::Bind { addr, source })
}

/// Runs the accept loop in the background, one task per connection.
pub fn spawn_listener(
    listener: TcpListener,
    handler: Arc<dyn MessageHandler>,
    peers: Arc<PeerBook>,
) -> JoinHandle<()> {
    tokio::spawn(serve(listener, handler, peers))
}

pub async fn serve(listener: TcpListener, handler: Arc<dyn MessageHandler>, peers: Arc<PeerBook>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let handler = Arc::clone(&handler);
                let peers = Arc::clone(&peers);
                tokio::spawn(async move {
                    if let Err(e) = receive(stream, addr, handler, &peers).await {
                        warn!("dropping connection from {}: {}", addr, e);
                    }
                });
            }
            Err(e) => {
                error!("error accepting connection: {}", e);
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}

async fn receive(
    mut stream: TcpStream,
    addr: SocketAddr,
    handler: Arc<dyn MessageHandler>,
    peers: &PeerBook,
) -> Result<(), P2pError> {
    let bytes = read_message(&mut stream, &addr.to_string()).await?;
    let proposal = codec::decode(&bytes)?;
    let from = peers.name_for(&addr);

    handler.handle_message(from, proposal).await;
    Ok(())
}

/// Reads until the peer closes its write half.
pub async fn read_message<R>(reader: &mut R, label: &str) -> Result<Vec<u8>, P2pError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    reader
        .take(MAX_MESSAGE_BYTES + 1)
        .read_to_end(&mut buf)
        .await
        .map_err(|source| P2pError::Receive {
            addr: label.to_string(),
            source,
        })?;

    if buf.len() as u64 > MAX_MESSAGE_BYTES {
        return Err(P2pError::Oversized(label.to_string(), MAX_MESSAGE_BYTES));
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_message_until_eof() {
        let mut input: &[u8] = b"4,q,host9";
        let bytes = read_message(&mut input, "test").await.unwrap();
        assert_eq!(bytes, b"4,q,host9");
    }

    #[tokio::test]
    async fn test_read_message_rejects_oversized() {
        let big = vec![b'1'; MAX_MESSAGE_BYTES as usize + 10];
        let mut input: &[u8] = &big;
        let err = read_message(&mut input, "test").await.unwrap_err();
        assert!(matches!(err, P2pError::Oversized(_, _)));
    }
}
