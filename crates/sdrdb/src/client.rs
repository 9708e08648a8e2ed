//! Typed SDRDB client
//!
//! One async method per server operation. Each call builds a command line,
//! performs a full connect → send → read-to-EOF → close exchange via
//! [`wire::Client`], and decodes the reply into the shape the operation is
//! documented to return. Errors come back as [`wire::Error`]; nothing is
//! retried here.

use std::path::Path;
use std::time::Duration;

use tracing::debug;

use wire::{Client as WireClient, Endpoint, Payload, Result};

use crate::command::{Command, QueryKind};

/// Client for a single SDRDB server.
///
/// Cheap to clone; holds no open connection between calls.
#[derive(Debug, Clone)]
pub struct SdrdbClient {
    wire: WireClient,
}

impl SdrdbClient {
    /// Create a client for the given endpoint.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            wire: WireClient::new(endpoint),
        }
    }

    /// Create a client for a Unix domain socket path.
    pub fn unix(path: impl AsRef<Path>) -> Self {
        Self {
            wire: WireClient::unix(path),
        }
    }

    /// Create a client for a TCP host/port.
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self {
            wire: WireClient::tcp(host, port),
        }
    }

    /// Bound each network phase of every call by `limit`.
    pub fn with_timeout(self, limit: Duration) -> Self {
        Self {
            wire: self.wire.with_timeout(limit),
        }
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &Endpoint {
        self.wire.endpoint()
    }

    async fn send(&self, command: Command) -> Result<Payload> {
        debug!(command = %command, "sdrdb request");
        self.wire.exchange(&command.line()).await
    }

    async fn query(&self, db: &str, weighted: bool, kind: QueryKind) -> Result<Payload> {
        self.send(Command::Query {
            db: db.to_string(),
            weighted,
            kind,
        })
        .await
    }

    // ========== Database management ==========

    /// Create a database holding concepts of the given trait width.
    /// Replies with the server's scalar acknowledgment.
    pub async fn create_database(&self, db: &str, width: u64) -> Result<u64> {
        self.send(Command::Create {
            db: db.to_string(),
            width,
        })
        .await?
        .into_scalar()
    }

    /// Drop a database.
    pub async fn drop_database(&self, db: &str) -> Result<u64> {
        self.send(Command::Drop { db: db.to_string() }).await?.into_scalar()
    }

    /// Empty a database, keeping it around.
    pub async fn clear_database(&self, db: &str) -> Result<u64> {
        self.send(Command::Clear { db: db.to_string() }).await?.into_scalar()
    }

    /// Set a new trait width for a database.
    pub async fn resize_database(&self, db: &str, width: u64) -> Result<u64> {
        self.send(Command::Resize {
            db: db.to_string(),
            width,
        })
        .await?
        .into_scalar()
    }

    // ========== Concept storage ==========

    /// Store a new concept carrying the given traits, returning its id.
    pub async fn put(&self, db: &str, traits: &[u64]) -> Result<u64> {
        self.send(Command::Put {
            db: db.to_string(),
            traits: traits.to_vec(),
        })
        .await?
        .into_scalar()
    }

    /// Replace the traits of a stored concept.
    ///
    /// The server acknowledges with a scalar whose meaning it does not
    /// document; it is returned as-is.
    pub async fn update(&self, db: &str, concept: u64, traits: &[u64]) -> Result<u64> {
        self.send(Command::Update {
            db: db.to_string(),
            concept,
            traits: traits.to_vec(),
        })
        .await?
        .into_scalar()
    }

    // ========== Queries ==========

    /// Similarity score between two stored concepts.
    pub async fn query_similarity(&self, db: &str, a: u64, b: u64) -> Result<u64> {
        self.query(db, false, QueryKind::Similarity { a, b })
            .await?
            .into_scalar()
    }

    /// Similarity between a concept and the union of `others`.
    pub async fn query_usimilarity(&self, db: &str, concept: u64, others: &[u64]) -> Result<u64> {
        self.query(
            db,
            false,
            QueryKind::UnionSimilarity {
                concept,
                others: others.to_vec(),
            },
        )
        .await?
        .into_scalar()
    }

    /// The `amount` concepts closest to `concept`, best match first, as
    /// `(id, score)` pairs in server order.
    pub async fn query_closest(
        &self,
        db: &str,
        amount: u64,
        concept: u64,
    ) -> Result<Vec<(u64, u64)>> {
        self.query(db, false, QueryKind::Closest { amount, concept })
            .await?
            .into_ranked()
    }

    /// Ids of concepts carrying the given traits.
    pub async fn query_matching(&self, db: &str, traits: &[u64]) -> Result<Vec<u64>> {
        self.query(
            db,
            false,
            QueryKind::Matching {
                traits: traits.to_vec(),
            },
        )
        .await?
        .into_ids()
    }

    /// Like [`query_matching`](Self::query_matching), capped at `amount`
    /// results.
    pub async fn query_matchingx(&self, db: &str, amount: u64, traits: &[u64]) -> Result<Vec<u64>> {
        self.query(
            db,
            false,
            QueryKind::MatchingX {
                amount,
                traits: traits.to_vec(),
            },
        )
        .await?
        .into_ids()
    }

    // ========== Weighted queries ==========
    //
    // Same shapes as above with the `weighted` modifier on the wire; the
    // server weights trait overlap by usage. `matching` does not accept it.

    /// Weighted similarity score between two stored concepts.
    pub async fn query_similarity_weighted(&self, db: &str, a: u64, b: u64) -> Result<u64> {
        self.query(db, true, QueryKind::Similarity { a, b })
            .await?
            .into_scalar()
    }

    /// Weighted similarity between a concept and the union of `others`.
    pub async fn query_usimilarity_weighted(
        &self,
        db: &str,
        concept: u64,
        others: &[u64],
    ) -> Result<u64> {
        self.query(
            db,
            true,
            QueryKind::UnionSimilarity {
                concept,
                others: others.to_vec(),
            },
        )
        .await?
        .into_scalar()
    }

    /// Weighted nearest neighbors, best match first.
    pub async fn query_closest_weighted(
        &self,
        db: &str,
        amount: u64,
        concept: u64,
    ) -> Result<Vec<(u64, u64)>> {
        self.query(db, true, QueryKind::Closest { amount, concept })
            .await?
            .into_ranked()
    }

    /// Weighted capped matching.
    pub async fn query_matchingx_weighted(
        &self,
        db: &str,
        amount: u64,
        traits: &[u64],
    ) -> Result<Vec<u64>> {
        self.query(
            db,
            true,
            QueryKind::MatchingX {
                amount,
                traits: traits.to_vec(),
            },
        )
        .await?
        .into_ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::UnixListener;
    use tokio::task::JoinHandle;
    use wire::Error;

    /// One scripted reply per accepted connection, same framing as the real
    /// server: read a line, write the reply, close. Resolves to the
    /// received line.
    fn spawn_server(path: &Path, reply: &'static str) -> JoinHandle<String> {
        let listener = UnixListener::bind(path).unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            reader.get_mut().write_all(reply.as_bytes()).await.unwrap();
            line
        })
    }

    #[tokio::test]
    async fn test_create_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sdrdb.sock");
        let server = spawn_server(&path, "1\n");

        let client = SdrdbClient::unix(&path);
        let ack = client.create_database("test1", 100).await.unwrap();

        assert_eq!(ack, 1);
        assert_eq!(server.await.unwrap(), "create test1 100\n");
    }

    #[tokio::test]
    async fn test_put_returns_concept_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sdrdb.sock");
        let server = spawn_server(&path, "17\n");

        let client = SdrdbClient::unix(&path);
        let id = client.put("test1", &[1, 4, 7]).await.unwrap();

        assert_eq!(id, 17);
        assert_eq!(server.await.unwrap(), "put test1 1 4 7\n");
    }

    #[tokio::test]
    async fn test_similarity_returns_score() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sdrdb.sock");
        let server = spawn_server(&path, "12\n");

        let client = SdrdbClient::unix(&path);
        let score = client.query_similarity("test1", 3, 9).await.unwrap();

        assert_eq!(score, 12);
        assert_eq!(server.await.unwrap(), "query test1 similarity 3 9\n");
    }

    #[tokio::test]
    async fn test_closest_returns_ranked_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sdrdb.sock");
        let server = spawn_server(&path, "2:99 8:95 1:80\n");

        let client = SdrdbClient::unix(&path);
        let ranked = client.query_closest("test1", 3, 5).await.unwrap();

        assert_eq!(ranked, vec![(2, 99), (8, 95), (1, 80)]);
        assert_eq!(server.await.unwrap(), "query test1 closest 3 5\n");
    }

    #[tokio::test]
    async fn test_weighted_closest_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sdrdb.sock");
        let server = spawn_server(&path, "2:99\n");

        let client = SdrdbClient::unix(&path);
        let ranked = client.query_closest_weighted("test1", 3, 5).await.unwrap();

        assert_eq!(ranked, vec![(2, 99)]);
        assert_eq!(server.await.unwrap(), "query test1 weighted closest 3 5\n");
    }

    #[tokio::test]
    async fn test_matching_empty_reply_is_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sdrdb.sock");
        let server = spawn_server(&path, "\n");

        let client = SdrdbClient::unix(&path);
        let ids = client.query_matching("test1", &[1, 2]).await.unwrap();

        assert_eq!(ids, Vec::<u64>::new());
        assert_eq!(server.await.unwrap(), "query test1 matching 1 2\n");
    }

    #[tokio::test]
    async fn test_error_frame_surfaces_for_any_operation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sdrdb.sock");
        let server = spawn_server(&path, "ERR: database not found => test1\n");

        let client = SdrdbClient::unix(&path);
        let err = client.resize_database("test1", 2000).await.unwrap_err();

        match err {
            Error::Protocol(message) => assert_eq!(message, "database not found => test1"),
            other => panic!("unexpected error: {:?}", other),
        }
        server.await.unwrap();
    }
}
