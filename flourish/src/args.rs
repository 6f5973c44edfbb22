use std::path::PathBuf;

use clap::Parser;

/// Flourish API server
#[derive(Debug, Parser)]
#[command(name = "flourish", about = "Backend API for the Flourish savings app")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "flourish.toml", env = "FLOURISH_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "FLOURISH_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
