use crate::connection::handle_connection;
use isl_codec::{LineHandler, ToyPrioritizer};
use isl_core::{IslError, ServerConfig, Session};
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// How long in-flight connections get to finish after shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);
const LISTEN_BACKLOG: i32 = 1024;

pub struct IslServer {
    config: ServerConfig,
    handler: Arc<dyn LineHandler>,
}

impl IslServer {
    /// A server on `addr` with default limits, answering toy requests.
    pub fn listen(addr: &str) -> Result<Self, IslError> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| IslError::InvalidAddress(addr.to_string()))?;
        let mut config = ServerConfig::default();
        config.set_listen(addr);
        Ok(Self::with_parts(config))
    }

    pub fn from_config(config: ServerConfig) -> Result<Self, IslError> {
        config.validate()?;
        Ok(Self::with_parts(config))
    }

    fn with_parts(config: ServerConfig) -> Self {
        Self {
            config,
            handler: Arc::new(ToyPrioritizer),
        }
    }

    /// Replaces the whole configuration, listen address included.
    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_handler<H: LineHandler + 'static>(mut self, handler: H) -> Self {
        self.handler = Arc::new(handler);
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Creates the listening socket. Must run inside a Tokio runtime.
    pub async fn bind(&self) -> Result<TcpListener, IslError> {
        let addr = self.config.socket_addr()?;
        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        socket.set_nonblocking(true)?;
        socket.bind(&addr.into())?;
        socket.listen(LISTEN_BACKLOG)?;

        let listener = TcpListener::from_std(std::net::TcpListener::from(socket))?;
        Ok(listener)
    }

    /// Binds and serves until Ctrl-C.
    pub async fn start(self) -> Result<(), IslError> {
        let listener = self.bind().await?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("received shutdown signal");
                    let _ = shutdown_tx.send(true);
                }
                Err(e) => {
                    warn!("cannot listen for shutdown signal: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        });

        self.serve(listener, shutdown_rx).await
    }

    /// Runs the accept loop on `listener`, one task per connection.
    ///
    /// Stops accepting once `shutdown` turns `true` or its sender is dropped,
    /// then waits up to 30s for in-flight connections before aborting them.
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), IslError> {
        info!("ISL server listening on {}", listener.local_addr()?);

        let config = Arc::new(self.config);
        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        info!("new connection from {}", addr);
                        let config = Arc::clone(&config);
                        let handler = Arc::clone(&self.handler);
                        connections.spawn(async move {
                            serve_connection(stream, addr, &config, handler.as_ref()).await;
                        });
                    }
                    Err(e) => error!("failed to accept connection: {}", e),
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("shutting down, draining {} connections", connections.len());
                        break;
                    }
                }
                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = joined {
                        warn!("connection task failed: {}", e);
                    }
                }
            }
        }

        let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;
        while !connections.is_empty() {
            match tokio::time::timeout_at(deadline, connections.join_next()).await {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(_) => {
                    warn!("drain timeout reached, aborting {} connections", connections.len());
                    connections.abort_all();
                    break;
                }
            }
        }

        info!("ISL server stopped");
        Ok(())
    }
}

async fn serve_connection(
    stream: TcpStream,
    addr: SocketAddr,
    config: &ServerConfig,
    handler: &dyn LineHandler,
) {
    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!("{}: cannot set TCP_NODELAY: {}", addr, e);
    }

    let mut session = Session::new(addr);
    let result = handle_connection(stream, &mut session, config, handler).await;
    session.close();

    match result {
        Ok(()) => {}
        Err(e) if e.is_protocol_violation() => warn!("{} rejected: {}", addr, e),
        Err(e) => warn!("{} transport failure: {}", addr, e),
    }

    info!(
        "{} disconnected after {:?} ({} requests, {} bytes in, {} bytes out)",
        addr,
        session.elapsed(),
        session.requests,
        session.bytes_decoded,
        session.bytes_encoded,
    );
}
