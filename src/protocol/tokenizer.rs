//! The tokenizer collaborator contract.
//!
//! A tokenizer is the leaf component that recognizes HTTP/1.x byte grammar.
//! The assembler owns exactly one tokenizer per message and drives it through
//! [`Tokenizer::feed`]; the tokenizer reports what it recognized as an ordered
//! sequence of [`TokenEvent`]s appended to a caller-supplied buffer during the
//! feed call. Expressing the stream as explicit events (instead of callbacks
//! into the assembler) keeps ordering guarantees without re-entrant mutation.
//!
//! A tokenizer signals rejection by consuming fewer bytes than it was given;
//! it has no error channel of its own. The assembler turns a short consume
//! into a terminal parse failure unless the message context was marked for
//! reset (interim 100-Continue messages).

use bytes::Bytes;
use http::{Method, Version};

/// A structured event recognized during a [`Tokenizer::feed`] call.
///
/// A single header name, value, URL, or body run may be delivered split
/// across several fragment events before the full unit is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenEvent {
    /// A new message started.
    MessageBegin,
    /// A fragment of the request target.
    Url(Bytes),
    /// A fragment of a header field name.
    HeaderField(Bytes),
    /// A fragment of a header field value.
    HeaderValue(Bytes),
    /// The head finished. `method` is `None` for response messages.
    HeadersComplete { method: Option<Method>, version: Version },
    /// A fragment of decoded body bytes.
    Body(Bytes),
    /// The full message (head and body) finished.
    MessageComplete,
}

/// The result of one [`Tokenizer::feed`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedOutcome {
    /// Number of input bytes accepted by the tokenizer. Anything short of the
    /// supplied length means the grammar rejected the input, the message
    /// ended before the buffer did, or an upgrade begins at this offset.
    pub consumed: usize,
    /// A protocol upgrade was requested; bytes past `consumed` belong to the
    /// upgraded protocol.
    pub upgrade: bool,
}

/// Byte-level HTTP/1.x grammar recognizer.
pub trait Tokenizer {
    /// Feeds a byte range, appending recognized events to `events`.
    ///
    /// Events are appended in protocol order and are complete by the time the
    /// call returns; `events` is not cleared by the tokenizer.
    fn feed(&mut self, input: &[u8], events: &mut Vec<TokenEvent>) -> FeedOutcome;

    /// Restores the internal grammar state for the next message on the same
    /// connection.
    fn reset(&mut self);

    /// The persistent-connection judgment for the current message.
    ///
    /// Valid once headers are complete; queried again at message completion
    /// since final framing can change the answer.
    fn is_keep_alive(&self) -> bool;
}
