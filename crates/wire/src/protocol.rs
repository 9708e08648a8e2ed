//! Reply classification and payload decoding
//!
//! Replies are either an error frame - the payload starts with the literal
//! marker `ERR:` - or a success payload in one of three shapes: a bare
//! integer, a ranked `id:score` list, or a plain id list. The protocol does
//! not self-describe the shape; the caller knows it from the command it
//! issued.

use thiserror::Error;

/// Marker prefix of an error frame.
const ERROR_MARKER: &str = "ERR:";

/// Errors raised by a wire exchange.
///
/// Exactly one of these is returned per failed call; nothing is retried or
/// swallowed inside the client.
#[derive(Error, Debug)]
pub enum Error {
    /// The transport could not be established. Nothing was sent.
    #[error("connection failed: {0}")]
    Connection(std::io::Error),

    /// A read or write failed after a successful connect.
    #[error("transport failed: {0}")]
    Transport(std::io::Error),

    /// The server replied with an error frame; the message is forwarded.
    #[error("server error: {0}")]
    Protocol(String),

    /// A success reply did not match the shape expected for the command.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A classified success payload.
///
/// [`Payload::classify`] is the only way to construct one, so the shape
/// decoders below can never run on an error frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(String);

impl Payload {
    /// Classify a raw reply.
    ///
    /// A payload whose first four characters are `ERR:` is an error frame;
    /// the remainder, trimmed of surrounding whitespace, becomes
    /// [`Error::Protocol`]. Everything else is a success payload.
    pub fn classify(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();

        if let Some(message) = raw.strip_prefix(ERROR_MARKER) {
            return Err(Error::Protocol(message.trim().to_string()));
        }

        Ok(Self(raw))
    }

    /// The raw payload text, as received.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the payload as a single base-10 integer.
    pub fn into_scalar(self) -> Result<u64> {
        parse_number(self.0.trim())
    }

    /// Decode the payload as an ordered `id:score` list.
    ///
    /// Order is preserved as received; the server sends best matches first
    /// and the client does not re-sort.
    pub fn into_ranked(self) -> Result<Vec<(u64, u64)>> {
        self.0
            .split_whitespace()
            .map(|token| {
                let (id, score) = token.split_once(':').ok_or_else(|| {
                    Error::MalformedResponse(format!("token {:?} is missing ':'", token))
                })?;
                Ok((parse_number(id)?, parse_number(score)?))
            })
            .collect()
    }

    /// Decode the payload as an ordered id list. An empty payload is an
    /// empty list.
    pub fn into_ids(self) -> Result<Vec<u64>> {
        self.0.split_whitespace().map(parse_number).collect()
    }
}

fn parse_number(token: &str) -> Result<u64> {
    token
        .parse()
        .map_err(|_| Error::MalformedResponse(format!("expected integer, got {:?}", token)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_success() {
        let payload = Payload::classify("42\n").unwrap();
        assert_eq!(payload.as_str(), "42\n");
    }

    #[test]
    fn test_classify_error_frame() {
        let err = Payload::classify("ERR:unknown database test1").unwrap_err();
        match err {
            Error::Protocol(message) => assert_eq!(message, "unknown database test1"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_classify_trims_error_message() {
        // The server writes "ERR: <reason> => <detail>\n"; the trailing
        // newline is framing, not message.
        let err = Payload::classify("ERR: bad syntax => foo\n").unwrap_err();
        match err {
            Error::Protocol(message) => assert_eq!(message, "bad syntax => foo"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_classify_is_exclusive() {
        // Only the exact four-character prefix marks an error frame.
        assert!(Payload::classify("ERRONEOUS").is_ok());
        assert!(Payload::classify("err: lowercase").is_ok());
        assert!(Payload::classify(" ERR: leading space").is_ok());
        assert!(Payload::classify("1 ERR: mid-payload").is_ok());
        assert!(Payload::classify("ERR:").is_err());
    }

    #[test]
    fn test_scalar() {
        assert_eq!(Payload::classify("42").unwrap().into_scalar().unwrap(), 42);
        assert_eq!(Payload::classify("17\n").unwrap().into_scalar().unwrap(), 17);
    }

    #[test]
    fn test_scalar_rejects_garbage() {
        let err = Payload::classify("fish").unwrap().into_scalar().unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_scalar_rejects_empty_payload() {
        let err = Payload::classify("").unwrap().into_scalar().unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_ranked_preserves_order() {
        let ranked = Payload::classify("3:10 7:9 1:2").unwrap().into_ranked().unwrap();
        assert_eq!(ranked, vec![(3, 10), (7, 9), (1, 2)]);
    }

    #[test]
    fn test_ranked_missing_separator() {
        let err = Payload::classify("3:10 7").unwrap().into_ranked().unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_ranked_non_numeric() {
        let err = Payload::classify("3:x").unwrap().into_ranked().unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_ranked_empty_payload() {
        assert_eq!(Payload::classify("\n").unwrap().into_ranked().unwrap(), vec![]);
    }

    #[test]
    fn test_ids() {
        let ids = Payload::classify("5 2 9").unwrap().into_ids().unwrap();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn test_ids_empty_payload() {
        assert_eq!(Payload::classify("").unwrap().into_ids().unwrap(), vec![]);
    }

    #[test]
    fn test_ids_tolerates_extra_whitespace() {
        // Duplicate or trailing whitespace never yields spurious tokens.
        let ids = Payload::classify("5  2 9 \n").unwrap().into_ids().unwrap();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn test_ids_non_numeric() {
        let err = Payload::classify("5 two 9").unwrap().into_ids().unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }
}
