use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use chatnet_daemon::{
    config::{NodeOptions, ServerConfig},
    MockServer,
};

#[derive(Parser, Debug)]
#[command(name = "chatnet_node")]
#[command(about = "Serve in-memory mock chat nodes over HTTP")]
struct Args {
    #[clap(flatten)]
    server: ServerConfig,

    /// Node to create at startup, may be repeated.
    #[arg(long = "node", default_value = "node")]
    nodes: Vec<String>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let server = MockServer::start(args.server)
        .await
        .context("Error while starting the mock node server")?;

    for id in &args.nodes {
        let node = server.create_node(id, NodeOptions::default());
        info!("Node {} is available at {}", node.id(), node.url());
    }

    tokio::signal::ctrl_c()
        .await
        .context("Error while waiting for Ctrl-C")?;

    server.stop().await;
    Ok(())
}
