//! Transport client: one connection per exchange
//!
//! The server signals end-of-reply by closing the stream, so a connection
//! is only good for a single request. [`Client::exchange`] opens the
//! transport, writes the command line, reads until EOF and closes again;
//! the client itself holds no connection between calls.

use std::fmt;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpStream, UnixStream};
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::protocol::{Error, Payload, Result};

/// Server address: a Unix domain socket path or a TCP host/port pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Unix(PathBuf),
    Tcp(String, u16),
}

/// Failure to parse an [`Endpoint`] from its string form.
#[derive(Error, Debug)]
#[error("invalid endpoint {0:?}: expected unix://PATH or HOST:PORT")]
pub struct InvalidEndpoint(pub String);

impl FromStr for Endpoint {
    type Err = InvalidEndpoint;

    /// Parse `unix:///path/to.sock` (or `unix:/path/to.sock`) as a domain
    /// socket path and `host:port` as a TCP address.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Some(path) = s.strip_prefix("unix://").or_else(|| s.strip_prefix("unix:")) {
            if path.is_empty() {
                return Err(InvalidEndpoint(s.to_string()));
            }
            return Ok(Endpoint::Unix(PathBuf::from(path)));
        }

        let (host, port) = s.rsplit_once(':').ok_or_else(|| InvalidEndpoint(s.to_string()))?;
        let port = port.parse().map_err(|_| InvalidEndpoint(s.to_string()))?;
        if host.is_empty() {
            return Err(InvalidEndpoint(s.to_string()));
        }

        Ok(Endpoint::Tcp(host.to_string(), port))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Unix(path) => write!(f, "unix://{}", path.display()),
            Endpoint::Tcp(host, port) => write!(f, "{}:{}", host, port),
        }
    }
}

/// SDRDB wire client.
///
/// Holds only the endpoint and an optional per-phase timeout. Cheap to
/// clone. Every call is a complete request/response cycle over its own
/// connection; no transport state survives between calls.
#[derive(Debug, Clone)]
pub struct Client {
    endpoint: Endpoint,
    timeout: Option<Duration>,
}

impl Client {
    /// Create a client for the given endpoint.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            timeout: None,
        }
    }

    /// Create a client for a Unix domain socket path.
    pub fn unix(path: impl AsRef<Path>) -> Self {
        Self::new(Endpoint::Unix(path.as_ref().to_path_buf()))
    }

    /// Create a client for a TCP host/port.
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self::new(Endpoint::Tcp(host.into(), port))
    }

    /// Bound each phase of an exchange (connect, write, read) by `limit`.
    ///
    /// Expiry surfaces as [`Error::Connection`] or [`Error::Transport`]
    /// with [`io::ErrorKind::TimedOut`].
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Send one command line and read the complete reply.
    ///
    /// `line` is written verbatim, trailing newline included. The reply is
    /// read until the server closes the stream, then classified. The
    /// connection is closed on every exit path, so the next call starts
    /// from a clean connect; nothing is retried here.
    pub async fn exchange(&self, line: &str) -> Result<Payload> {
        trace!(endpoint = %self.endpoint, "sending {:?}", line);

        let start = Instant::now();

        let raw = match self.connect().await? {
            Stream::Unix(stream) => self.converse(stream, line).await?,
            Stream::Tcp(stream) => self.converse(stream, line).await?,
        };

        debug!(
            endpoint = %self.endpoint,
            bytes = raw.len(),
            elapsed_ms = start.elapsed().as_micros() as f64 / 1000.0,
            "exchange complete"
        );

        Payload::classify(raw)
    }

    async fn connect(&self) -> Result<Stream> {
        self.bounded(Stream::open(&self.endpoint))
            .await
            .map_err(Error::Connection)
    }

    /// Write the command, read to EOF. The stream is dropped (closed) on
    /// return, success or failure.
    async fn converse<S>(&self, mut stream: S, line: &str) -> Result<String>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let write = async {
            stream.write_all(line.as_bytes()).await?;
            stream.flush().await
        };
        self.bounded(write).await.map_err(Error::Transport)?;

        trace!("command sent, reading reply");

        let mut raw = Vec::new();
        self.bounded(stream.read_to_end(&mut raw))
            .await
            .map_err(Error::Transport)?;

        String::from_utf8(raw)
            .map_err(|_| Error::MalformedResponse("reply is not valid UTF-8".to_string()))
    }

    async fn bounded<T>(&self, fut: impl Future<Output = io::Result<T>>) -> io::Result<T> {
        match self.timeout {
            Some(limit) => match timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => Err(io::Error::new(io::ErrorKind::TimedOut, "exchange phase timed out")),
            },
            None => fut.await,
        }
    }
}

enum Stream {
    Unix(UnixStream),
    Tcp(TcpStream),
}

impl Stream {
    async fn open(endpoint: &Endpoint) -> io::Result<Self> {
        Ok(match endpoint {
            Endpoint::Unix(path) => Stream::Unix(UnixStream::connect(path).await?),
            Endpoint::Tcp(host, port) => {
                Stream::Tcp(TcpStream::connect((host.as_str(), *port)).await?)
            }
        })
    }
}
