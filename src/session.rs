//! The TCP session with the target server.
//!
//! The wire protocol has no framing beyond newlines and no end-of-response
//! marker of any kind, so "the server went quiet" is detected by a fixed
//! per-read idle timeout. That timeout is the designed completion signal,
//! not an error; see [`GameSession::drain_until_idle`].

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use socket2::{SockRef, TcpKeepalive};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::Framed;
use tracing::{debug, warn};

use crate::codec::LineCodec;
use crate::error::{Result, SessionError};

/// A live, authenticatable connection to the game.
///
/// The session never reads on its own initiative: every read happens inside
/// a drain requested by the caller, which keeps exactly one command
/// outstanding at any time.
#[derive(Debug)]
pub struct GameSession {
    framed: Framed<TcpStream, LineCodec>,
    idle_timeout: Duration,
}

impl GameSession {
    /// Open a TCP connection to `addr`.
    ///
    /// `connect_timeout` bounds this call only; `idle_timeout` is the
    /// per-read bound used by every subsequent drain. Refusal, unreachable
    /// hosts, and timeout each surface as their own [`SessionError`]
    /// variant.
    pub async fn connect(
        addr: &str,
        connect_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self> {
        let stream = match timeout(connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(SessionError::Connect {
                    addr: addr.to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(SessionError::ConnectTimedOut {
                    addr: addr.to_string(),
                    after: connect_timeout,
                })
            }
        };

        if let Err(e) = enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }
        debug!(%addr, "connected");

        Ok(Self {
            framed: Framed::new(stream, LineCodec::new()),
            idle_timeout,
        })
    }

    /// Send the login line, then drain the greeting and MOTD spill.
    pub async fn login(&mut self, credentials: &str, sink: impl FnMut(&str)) -> Result<usize> {
        self.send_line(credentials).await?;
        self.drain_until_idle(sink).await
    }

    /// Write one command line (the newline comes from the codec).
    ///
    /// Does not drain. Callers sequence a send and then its drain before
    /// issuing anything else.
    pub async fn send_line(&mut self, line: &str) -> Result<()> {
        self.framed.send(line).await
    }

    /// Read lines until a read attempt times out with no data, forwarding
    /// each line verbatim to `sink`.
    ///
    /// Returns `Ok(lines_forwarded)` when the idle timeout fires, the
    /// protocol's only way of saying "response complete". An EOF from the
    /// server and every other socket-level error are fatal and propagate.
    pub async fn drain_until_idle(&mut self, mut sink: impl FnMut(&str)) -> Result<usize> {
        let mut drained = 0;
        loop {
            match timeout(self.idle_timeout, self.framed.next()).await {
                Ok(Some(Ok(line))) => {
                    sink(&line);
                    drained += 1;
                }
                Ok(Some(Err(e))) => return Err(e),
                Ok(None) => return Err(SessionError::ConnectionClosed),
                // No data within the idle window: the response is over.
                Err(_elapsed) => return Ok(drained),
            }
        }
    }
}

fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));

    sock.set_tcp_keepalive(&keepalive)
}
