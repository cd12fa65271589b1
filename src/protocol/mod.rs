//! Core protocol abstractions for incoming HTTP/1.x messages.
//!
//! This module provides the building blocks the rest of the crate is wired
//! around:
//!
//! - **Message assembly** ([`incoming`]): [`IncomingMessage`] folds tokenizer
//!   events into a parsed message and streams its body on demand
//! - **Tokenizer contract** ([`tokenizer`]): the [`Tokenizer`] trait and the
//!   [`TokenEvent`] stream it produces during a feed
//! - **Header accumulation** ([`headers`]): fragment buffering and the
//!   single-value/multi-value merge policy
//! - **Payload vocabulary** ([`message`]): [`PayloadItem`] chunks and the
//!   [`PayloadSize`] framing strategies
//! - **Error handling** ([`error`]): [`ParseError`] and the terminal
//!   [`ParseErrorKind`] set
//!
//! One [`IncomingMessage`] instance is accessed by exactly one logical
//! connection-handling flow at a time; there is no internal locking. All
//! operations are synchronous and block only as far as the supplied transport
//! blocks.

mod error;
pub use error::ParseError;
pub use error::ParseErrorKind;

mod message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod tokenizer;
pub use tokenizer::FeedOutcome;
pub use tokenizer::TokenEvent;
pub use tokenizer::Tokenizer;

mod headers;

mod incoming;
pub use incoming::IncomingMessage;
pub use incoming::ParseState;
