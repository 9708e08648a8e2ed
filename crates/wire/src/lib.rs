//! Wire protocol and transport client for SDRDB
//!
//! This crate provides the low-level infrastructure for talking to an SDRDB
//! server over a Unix domain or TCP socket. It has no knowledge of specific
//! SDRDB commands - it sends one ASCII line, reads the complete reply, and
//! classifies it.
//!
//! # Architecture
//!
//! ```text
//! Domain crate (sdrdb)            Wire crate
//! ┌─────────────────────────┐    ┌─────────────────────┐
//! │  SdrdbClient            │───>│  Client             │
//! │  (typed operations)     │    │  (line exchange)    │
//! └─────────────────────────┘    └──────────┬──────────┘
//!                                           │
//!                                           v
//!                                Unix or TCP socket
//!                                           │
//!                                           v
//!                                    ┌──────────────┐
//!                                    │ SDRDB server │
//!                                    └──────────────┘
//! ```
//!
//! The protocol is one request per connection: the server signals the end of
//! a reply by closing the stream, so every exchange opens a fresh connection
//! and closes it once the reply has been read.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wire::Client;
//!
//! let client = Client::unix("/tmp/sdrdb.sock");
//!
//! let payload = client.exchange("query animals closest 10 5\n").await?;
//! let ranked = payload.into_ranked()?;
//! ```

mod client;
mod protocol;

pub use client::{Client, Endpoint, InvalidEndpoint};
pub use protocol::{Error, Payload, Result};
