use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use uuid::Uuid;

use crate::codec::{Codec, Inbound};
use crate::frame::Frame;
use crate::Error;

/// A client connection: the socket wrapped in the wire codec, plus an id
/// used to correlate log lines.
pub struct Connection {
    pub id: Uuid,
    framed: Framed<TcpStream, Codec>,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Connection {
        Connection {
            id: Uuid::new_v4(),
            framed: Framed::new(stream, Codec::new()),
        }
    }

    /// Reads the next complete request or in-band protocol violation. `None`
    /// means the client closed the connection cleanly.
    pub async fn read_request(&mut self) -> Result<Option<Inbound>, Error> {
        match self.framed.next().await {
            Some(Ok(inbound)) => Ok(Some(inbound)),
            Some(Err(err)) => Err(err),
            None => Ok(None),
        }
    }

    pub async fn write_frame(&mut self, frame: Frame) -> Result<(), Error> {
        self.framed.send(frame).await
    }
}
