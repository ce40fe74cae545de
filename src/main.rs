use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use matsya_invoices::{logging, server, Converter, Deployment};

/// Upload service converting daily sales exports into invoice imports.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "MATSYA_BIND", default_value = "0.0.0.0:5050")]
    bind: SocketAddr,

    /// Deployment file with the customer registry and account id
    /// (default: the built-in deployment)
    #[arg(short, long, env = "MATSYA_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the rotated JSON log file
    #[arg(long, env = "MATSYA_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _guard = logging::init_logging(args.log_dir.as_deref()).context("failed to set up logging")?;

    let deployment =
        Deployment::load(args.config.as_deref()).context("failed to load deployment")?;
    let converter = Converter::for_deployment(&deployment)?;
    let app = server::router(server::AppState::new(converter));

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(addr = %args.bind, deployment = %deployment.name, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
