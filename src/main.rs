//! The rosterd binary — CLI flags, logging setup, and the serve loop.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rosterd::directory::StudentDirectory;
use rosterd::server::Server;
use rosterd::service::Api;

#[derive(Parser)]
#[command(name = "rosterd", version, about = "In-memory student directory over HTTP")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: String,

    /// Log filter directives, e.g. "debug" or "rosterd=debug" (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = match &args.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let api = Arc::new(Api::new(Arc::new(StudentDirectory::seeded())));

    let server = Server::bind(&args.addr).await?;
    server
        .run(move |request| {
            let api = Arc::clone(&api);
            async move { api.handle(request).await }
        })
        .await?;

    Ok(())
}
