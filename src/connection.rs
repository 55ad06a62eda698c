use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::trace;

use crate::error::KvMiddlewareError;
use crate::resp::{Reply, encode_command, read_reply};

/// One physical store connection: a buffered TCP stream plus reusable
/// encode/decode buffers. Dropping the value closes the socket.
#[derive(Debug)]
pub struct StoreConnection {
    reader: BufReader<TcpStream>,
    line_buf: Vec<u8>,
    write_buf: Vec<u8>,
}

impl StoreConnection {
    /// Open a TCP connection to `addr`. Nagle is disabled; command
    /// payloads are small and latency-bound.
    ///
    /// # Errors
    /// `ConnectionError` when the dial fails, IO errors from socket setup.
    pub async fn dial(addr: &str) -> Result<Self, KvMiddlewareError> {
        let stream = TcpStream::connect(addr).await.map_err(|err| {
            KvMiddlewareError::ConnectionError(format!("failed to connect to {addr}: {err}"))
        })?;
        stream.set_nodelay(true)?;
        Ok(StoreConnection {
            reader: BufReader::new(stream),
            line_buf: Vec::with_capacity(128),
            write_buf: Vec::with_capacity(256),
        })
    }

    /// Send one command and read its reply.
    ///
    /// # Errors
    /// IO errors pass through; malformed replies surface as
    /// `ProtocolError`. Error replies come back as `Ok(Reply::Error)` so
    /// callers decide how to surface them.
    pub async fn execute(
        &mut self,
        command: &str,
        args: &[&str],
    ) -> Result<Reply, KvMiddlewareError> {
        trace!(command, args = args.len(), "store round-trip");
        self.write_buf.clear();
        encode_command(command, args, &mut self.write_buf);
        let stream = self.reader.get_mut();
        stream.write_all(&self.write_buf).await?;
        stream.flush().await?;
        read_reply(&mut self.reader, &mut self.line_buf).await
    }
}
