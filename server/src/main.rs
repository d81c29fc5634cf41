use clap::Parser;
use todo_server::Config;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), todo_server::StartupError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).try_init() {
        eprintln!("tracing init failed: {e}");
    }

    let config = Config::parse();
    if let Err(err) = todo_server::serve(config).await {
        tracing::error!(error = %err, "server failed");
        return Err(err);
    }
    Ok(())
}
