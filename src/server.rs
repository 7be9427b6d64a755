use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::net::{TcpListener, TcpStream};
use tokio::time;
use tracing::{debug, error, info, instrument};

use crate::aof::Aof;
use crate::codec::Inbound;
use crate::commands;
use crate::connection::Connection;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

pub struct Config {
    pub port: u16,
    /// How often the background sweep evicts expired keys.
    pub cleanup_interval: Duration,
    /// Append-log file. `None` disables persistence.
    pub aof_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            port: 6379,
            cleanup_interval: Duration::from_secs(1),
            aof_path: None,
        }
    }
}

pub async fn run(config: Config) -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let listener = TcpListener::bind(("127.0.0.1", config.port)).await?;
    let store = Store::new();

    let aof = match &config.aof_path {
        Some(path) => {
            let applied = Aof::load(path, &store)?;
            info!("Replayed {} entries from append log", applied);
            Some(Arc::new(Aof::open(path)?))
        }
        None => None,
    };

    spawn_expiry_sweep(store.clone(), config.cleanup_interval);

    info!("Server listening on {}", listener.local_addr()?);

    loop {
        let (socket, client_address) = listener.accept().await?;
        let store = store.clone();
        let aof = aof.clone();
        info!("Accepted connection from {:?}", client_address);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, client_address, store, aof).await {
                error!("Connection error: {}", e);
            }
        });
    }
}

fn spawn_expiry_sweep(store: Store, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        loop {
            ticker.tick().await;
            let removed = store.cleanup_expired();
            if removed > 0 {
                debug!("Swept {} expired keys", removed);
            }
        }
    });
}

#[instrument(
    name = "connection",
    skip(stream, store, aof),
    fields(connection_id, client_address)
)]
async fn handle_connection(
    stream: TcpStream,
    client_address: SocketAddr,
    store: Store,
    aof: Option<Arc<Aof>>,
) -> Result<(), Error> {
    let mut conn = Connection::new(stream);

    tracing::Span::current()
        .record("connection_id", conn.id.to_string())
        .record("client_address", client_address.to_string());

    while let Some(inbound) = conn.read_request().await? {
        let request = match inbound {
            Inbound::Request(request) => request,
            Inbound::ProtocolError(err) => {
                // The violation is scoped to the one request that caused it;
                // report it and keep reading from where the parser stopped.
                conn.write_frame(Frame::Error(err.to_string())).await?;
                continue;
            }
        };

        if request.parts.is_empty() {
            continue;
        }
        debug!("Received request: {:?}", request);

        let name = String::from_utf8_lossy(&request.parts[0]).to_uppercase();
        let args: Vec<Bytes> = request.parts[1..].to_vec();

        let reply = commands::dispatch(&store, request);

        if let Some(aof) = &aof {
            let succeeded = !matches!(reply, Frame::Error(_));
            if succeeded && commands::is_write_command(&name) {
                if let Err(e) = aof.append(&name, &args) {
                    error!("Failed to append to log: {}", e);
                }
            }
        }

        debug!("Sending reply: {:?}", reply);
        conn.write_frame(reply).await?;
    }

    info!("Connection closed");
    Ok(())
}
