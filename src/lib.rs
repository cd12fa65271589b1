//! Blocking, incremental HTTP/1.x message assembly
//!
//! This crate turns byte fragments arriving at arbitrary boundaries into a
//! well-formed HTTP/1.x message (method/URL/version, headers, body). It is
//! built for transport connections that are reused across messages
//! (keep-alive): the per-message state machine can be torn down and rebuilt
//! around the same tokenizer without leaking buffered data from a prior
//! message into the next.
//!
//! # Features
//!
//! - Incremental parsing across arbitrary read boundaries
//! - Ordered, case-insensitive header accumulation with a first-wins policy
//!   for single-value header names
//! - Streaming body reads, full-body materialization, and drain mode
//! - Chunked transfer encoding and Content-Length framing
//! - Keep-alive detection and tokenizer reuse across messages
//! - Protocol upgrade offset hand-off
//! - Clean error handling
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//!
//! use bytes::BytesMut;
//! use inbound_http::codec::{Http1Tokenizer, MessageKind};
//! use inbound_http::protocol::{IncomingMessage, ParseState};
//!
//! let tokenizer = Http1Tokenizer::new(MessageKind::Request);
//! let mut message = IncomingMessage::new(tokenizer);
//!
//! let head = b"POST /upload HTTP/1.1\r\nHost: example.test\r\nContent-Length: 5\r\n\r\n";
//! assert_eq!(message.parse(head), ParseState::HeadersComplete);
//! assert_eq!(message.url(), "/upload");
//!
//! // Body bytes are pulled from the transport on demand.
//! let mut transport = Cursor::new(b"hello".to_vec());
//! let mut body = BytesMut::new();
//! let total = message.read_body_to_end(&mut transport, &mut body).unwrap();
//! assert_eq!(total, 5);
//! assert_eq!(&body[..], b"hello");
//! assert_eq!(message.state(), ParseState::MessageComplete);
//! ```
//!
//! # Architecture
//!
//! The crate is organized into two modules:
//!
//! - [`protocol`]: the message assembler, the header merge policy, the
//!   tokenizer contract, and the error types
//! - [`codec`]: the default HTTP/1.x tokenizer and its body framing decoders
//!
//! The assembler ([`protocol::IncomingMessage`]) owns exactly one tokenizer
//! for the lifetime of one message and drives it over byte ranges supplied by
//! the caller. The tokenizer reports structured events
//! ([`protocol::TokenEvent`]) which the assembler folds into message state.
//! Transports are plain [`std::io::Read`] values passed into each body
//! operation; there is no event loop and no internal locking — one message
//! instance belongs to one connection-handling flow at a time.
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 only
//! - No TLS support (terminate TLS in the transport layer)
//! - Maximum head size: 8KB
//! - Maximum number of headers: 64

pub mod codec;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
