use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use typedis::server::{self, Config};
use typedis::Error;

const PORT: u16 = 6379;

#[derive(Parser, Debug)]
struct Args {
    /// The port to listen on
    #[arg(short, long, default_value_t = PORT, env = "TYPEDIS_PORT")]
    port: u16,

    /// Seconds between expired-key sweeps
    #[arg(long, default_value_t = 1)]
    cleanup_interval: u64,

    /// Append-log file for persistence across restarts
    #[arg(long, env = "TYPEDIS_AOF")]
    aof: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    server::run(Config {
        port: args.port,
        cleanup_interval: Duration::from_secs(args.cleanup_interval),
        aof_path: args.aof,
    })
    .await
}
