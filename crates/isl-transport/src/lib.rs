pub use isl_core::{IslError, ServerConfig, Session, SessionPhase};
pub mod connection;
pub mod server;
pub mod stream;

pub use connection::handle_connection;
pub use server::IslServer;
pub use stream::{ObfuscatedReader, ObfuscatedWriter};
