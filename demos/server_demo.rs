use isl_core::ServerConfig;
use isl_transport::IslServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut config = ServerConfig::default();
    config.host = "127.0.0.1".to_string();
    config.threads = 1;
    config.max_line_len = 1024;

    IslServer::from_config(config)?.start().await?;

    Ok(())
}
