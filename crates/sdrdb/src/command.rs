//! Command encoding for the SDRDB line protocol
//!
//! Every operation renders to a single space-separated, newline-terminated
//! ASCII line, verb first:
//!
//! ```text
//! create <db> <width>
//! drop <db>
//! clear <db>
//! resize <db> <width>
//! put <db> <trait>...
//! update <db> <concept_id> <trait>...
//! query <db> [weighted] <kind> ...
//! ```
//!
//! Database names are inserted as-is; the protocol assumes they contain no
//! whitespace and the encoder does not validate or escape them. Earlier
//! protocol revisions used `create database <db>` / `put into <db> as
//! <name>` verbs; that grammar is incompatible with this one and is not
//! supported.

use std::fmt;

/// A single SDRDB request.
///
/// Rendering is pure; a command carries no transport state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a database holding concepts of the given trait width.
    Create { db: String, width: u64 },
    /// Drop a database.
    Drop { db: String },
    /// Empty a database, keeping it around.
    Clear { db: String },
    /// Set a new trait width for a database.
    Resize { db: String, width: u64 },
    /// Store a new concept; the server replies with its id.
    Put { db: String, traits: Vec<u64> },
    /// Replace the traits of a stored concept.
    Update {
        db: String,
        concept: u64,
        traits: Vec<u64>,
    },
    /// Run a query. `weighted` weights trait overlap by usage; the server
    /// rejects it for [`QueryKind::Matching`].
    Query {
        db: String,
        weighted: bool,
        kind: QueryKind,
    },
}

/// The five query kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    /// Similarity score between two stored concepts.
    Similarity { a: u64, b: u64 },
    /// Similarity between a concept and the union of other concepts.
    UnionSimilarity { concept: u64, others: Vec<u64> },
    /// The `amount` concepts closest to `concept`, best match first.
    Closest { amount: u64, concept: u64 },
    /// Ids of concepts carrying the given traits.
    Matching { traits: Vec<u64> },
    /// Like `Matching`, capped at `amount` results.
    MatchingX { amount: u64, traits: Vec<u64> },
}

impl Command {
    /// Render the newline-terminated wire line.
    pub fn line(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Create { db, width } => write!(f, "create {} {}", db, width),
            Command::Drop { db } => write!(f, "drop {}", db),
            Command::Clear { db } => write!(f, "clear {}", db),
            Command::Resize { db, width } => write!(f, "resize {} {}", db, width),
            Command::Put { db, traits } => {
                write!(f, "put {}", db)?;
                write_list(f, traits)
            }
            Command::Update { db, concept, traits } => {
                write!(f, "update {} {}", db, concept)?;
                write_list(f, traits)
            }
            Command::Query { db, weighted, kind } => {
                write!(f, "query {}", db)?;
                if *weighted {
                    write!(f, " weighted")?;
                }
                match kind {
                    QueryKind::Similarity { a, b } => write!(f, " similarity {} {}", a, b),
                    QueryKind::UnionSimilarity { concept, others } => {
                        write!(f, " usimilarity {}", concept)?;
                        write_list(f, others)
                    }
                    QueryKind::Closest { amount, concept } => {
                        write!(f, " closest {} {}", amount, concept)
                    }
                    QueryKind::Matching { traits } => {
                        write!(f, " matching")?;
                        write_list(f, traits)
                    }
                    QueryKind::MatchingX { amount, traits } => {
                        write!(f, " matchingx {}", amount)?;
                        write_list(f, traits)
                    }
                }
            }
        }
    }
}

/// Space-separated operands in caller order; empty lists render nothing,
/// not a trailing space.
fn write_list(f: &mut fmt::Formatter<'_>, items: &[u64]) -> fmt::Result {
    for item in items {
        write!(f, " {}", item)?;
    }
    Ok(())
}
