use anyhow::{Context, Result};
use clap::Parser;
use isl_core::ServerConfig;
use isl_transport::IslServer;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Insecure Sockets Layer server: obfuscated, line-oriented toy prioritizer.
#[derive(Parser, Debug)]
#[command(name = "isl-server")]
#[command(version)]
struct Args {
    /// TOML config file. Flags below override its values.
    #[arg(long, env = "ISL_CONFIG")]
    config: Option<PathBuf>,
    /// Socket address to listen on.
    #[arg(long, env = "ISL_LISTEN")]
    listen: Option<SocketAddr>,
    /// Tokio worker threads.
    #[arg(long, env = "ISL_THREADS")]
    threads: Option<usize>,
    /// Maximum cipher spec length in bytes, terminator excluded.
    #[arg(long, env = "ISL_MAX_SPEC_LEN")]
    max_spec_len: Option<usize>,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ServerConfig::default(),
        };
        if let Some(listen) = self.listen {
            config.set_listen(listen);
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(max_spec_len) = self.max_spec_len {
            config.max_spec_len = max_spec_len;
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let config = Args::parse().into_config()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.threads)
        .thread_name("isl-worker")
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(async move {
        IslServer::from_config(config)?.start().await?;
        Ok::<(), anyhow::Error>(())
    })
}
