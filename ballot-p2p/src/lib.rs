pub mod codec;
pub mod config;
pub mod error;
pub mod in_memory;
pub mod peer_book;
pub mod ports;
pub mod tcp;

pub use config::P2pConfig;
pub use error::P2pError;
pub use ports::{MessageHandler, Transport};
pub use tcp::TcpTransport;
