pub mod config;
pub mod error;
pub mod session;

pub use config::ServerConfig;
pub use error::IslError;
pub use session::{Session, SessionPhase};
