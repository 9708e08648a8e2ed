//! Typed client for the SDRDB similarity-search database
//!
//! SDRDB stores sparse binary concept representations - each concept is the
//! set of trait positions it carries - and answers similarity and
//! nearest-neighbor queries over them. This crate provides the typed client:
//! one method per server operation, each encoding a command line, exchanging
//! it over [`wire`], and decoding the reply into the operation's documented
//! shape.
//!
//! # Architecture
//!
//! ```text
//! SdrdbClient (typed operations)
//!        │
//!        v
//! wire::Client (line exchange, one connection per request)
//!        │
//!        v
//! Unix or TCP socket ──── SDRDB server
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use sdrdb::SdrdbClient;
//!
//! let client = SdrdbClient::unix("/tmp/sdrdb.sock");
//!
//! client.create_database("animals", 1000).await?;
//! let id = client.put("animals", &[1, 4, 7]).await?;
//! let ranked = client.query_closest("animals", 10, id).await?;
//! ```

mod client;
mod command;

pub use client::SdrdbClient;
pub use command::{Command, QueryKind};
pub use wire::{Endpoint, Error, InvalidEndpoint, Payload, Result};
