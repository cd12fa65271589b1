//! Incremental assembly of one incoming HTTP/1.x message.
//!
//! [`IncomingMessage`] owns the per-message state machine, the accumulated
//! header container, the pending-body queue, and the lifecycle of one
//! tokenizer instance. The owning connection feeds it raw byte ranges via
//! [`IncomingMessage::parse`] and pulls body bytes on demand through the read
//! operations, supplying the transport as a borrowed [`Read`] handle per
//! call.
//!
//! The state machine is strictly per message: on a keep-alive connection the
//! tokenizer is recovered with [`IncomingMessage::into_tokenizer`] and handed
//! to a fresh instance via [`IncomingMessage::reusing`], which performs the
//! explicit tokenizer reset. On error or non-persistent completion the
//! tokenizer is released immediately and any further feed fails.

use std::cmp;
use std::collections::VecDeque;
use std::io::Read;
use std::str;

use bytes::{Buf, Bytes, BytesMut};
use http::{HeaderMap, Method, Version};
use tracing::{debug, trace};

use crate::protocol::headers::HeaderAccumulator;
use crate::protocol::{FeedOutcome, ParseError, ParseErrorKind, TokenEvent, Tokenizer};

/// Transport chunk size for on-demand body reads.
const IO_BUFFER_SIZE: usize = 2048;

/// State of one incoming message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseState {
    /// No complete head yet; bytes are still being fed to the tokenizer.
    #[default]
    Initial,
    /// The head finished; the body (if any) has not.
    HeadersComplete,
    /// Head and body both finished.
    MessageComplete,
    /// The prior message context was marked for reuse; the next feed starts a
    /// fresh message over the same tokenizer.
    Reset,
    /// Terminal failure; the tokenizer has been released.
    Failed(ParseErrorKind),
}

/// One incoming HTTP/1.x message being assembled from a byte stream.
///
/// Exactly one connection-handling flow may access an instance at a time;
/// there is no internal locking. All operations are synchronous and block
/// only as far as the supplied transport blocks.
#[derive(Debug)]
pub struct IncomingMessage<T> {
    /// Exclusively owned for the lifetime of one message, `None` once released
    tokenizer: Option<T>,
    state: ParseState,
    keep_alive: bool,
    version: Option<Version>,
    method: Option<Method>,
    /// Raw request target bytes, accumulated across url events
    url: BytesMut,
    /// Decoded form of `url`, available once headers are complete
    url_string: String,
    headers: HeaderMap,
    accumulator: HeaderAccumulator,
    /// Body bytes decoded by the tokenizer but not yet handed to a caller
    pending_body: VecDeque<Bytes>,
    /// When false, body fragments are discarded on arrival (drain mode)
    save_body: bool,
    upgrade_offset: Option<usize>,
    /// Scratch event buffer reused across feeds
    events: Vec<TokenEvent>,
}

impl<T: Tokenizer> IncomingMessage<T> {
    /// Creates a message around a fresh tokenizer.
    pub fn new(tokenizer: T) -> Self {
        Self {
            tokenizer: Some(tokenizer),
            state: ParseState::Initial,
            keep_alive: false,
            version: None,
            method: None,
            url: BytesMut::new(),
            url_string: String::new(),
            headers: HeaderMap::new(),
            accumulator: HeaderAccumulator::default(),
            pending_body: VecDeque::new(),
            save_body: true,
            upgrade_offset: None,
            events: Vec::new(),
        }
    }

    /// Creates a message around a tokenizer recovered from a completed
    /// keep-alive message, resetting its grammar state first.
    pub fn reusing(mut tokenizer: T) -> Self {
        tokenizer.reset();
        Self::new(tokenizer)
    }

    /// Feeds a byte range to the tokenizer and folds the recognized events
    /// into message state.
    ///
    /// Bytes are consumed while the state is [`ParseState::Initial`]; once
    /// the head completes, remaining body bytes in the same range are decoded
    /// into the pending-body queue. A zero-length range while a message is
    /// expected is a terminal [`ParseErrorKind::UnexpectedEof`]. A tokenizer
    /// that accepts fewer bytes than supplied fails the message with
    /// [`ParseErrorKind::ParsedLessThanRead`] unless the context was marked
    /// [`ParseState::Reset`], in which case parsing restarts at the consumed
    /// offset (interim 100-Continue messages).
    pub fn parse(&mut self, buffer: &[u8]) -> ParseState {
        if self.tokenizer.is_none() {
            self.state = ParseState::Failed(ParseErrorKind::Internal);
            return self.state;
        }

        if buffer.is_empty() {
            // Unexpected EOF. The owning connection usually just closes.
            self.release_tokenizer();
            self.state = ParseState::Failed(ParseErrorKind::UnexpectedEof);
            return self.state;
        }

        // Marked for reuse because of keep alive
        if self.state == ParseState::Reset {
            self.restart();
        }

        let mut start = 0;
        let mut length = buffer.len();
        while self.state == ParseState::Initial && length > 0 {
            let outcome = match self.feed(&buffer[start..start + length]) {
                Ok(outcome) => outcome,
                Err(e) => {
                    debug!(error = %e, "event dispatch failed");
                    self.fail(e.kind());
                    return self.state;
                }
            };

            if outcome.upgrade {
                // Hand-off point for an upgrade-aware transport layer; the
                // upgraded protocol itself is not parsed here.
                self.upgrade_offset = Some(start + outcome.consumed);
                trace!(offset = start + outcome.consumed, "upgrade requested");
                break;
            } else if outcome.consumed != length {
                if self.state == ParseState::Reset {
                    // The short message was an interim one, keep on parsing
                    self.restart();
                    start += outcome.consumed;
                } else {
                    debug!(consumed = outcome.consumed, supplied = length, "tokenizer stopped short");
                    self.fail(ParseErrorKind::ParsedLessThanRead);
                    return self.state;
                }
            } else {
                start += outcome.consumed;
            }
            length -= outcome.consumed;
        }

        self.state
    }

    /// Marks the message context so the next feed starts a fresh message.
    ///
    /// Used by the owning connection after an interim message (100 Continue)
    /// completed: the same tokenizer parses the real message next. Buffered
    /// url bytes and header fragments are discarded immediately.
    pub fn reset(&mut self) {
        self.accumulator.clear();
        self.url.clear();
        self.state = ParseState::Reset;
    }

    /// Reads up to `dst.len()` body bytes, pulling from the transport when
    /// the pending queue is empty and the body is still in progress.
    ///
    /// Returns the number of bytes copied; zero means the body is exhausted
    /// for now or completed. A zero-byte transport read completes the
    /// message. Transport failures release the tokenizer and propagate.
    pub fn read_body<R: Read>(&mut self, transport: &mut R, dst: &mut [u8]) -> Result<usize, ParseError> {
        let mut count = self.fill_pending(dst);
        if count == 0 && self.state == ParseState::HeadersComplete {
            if self.tokenizer.is_none() {
                self.fail(ParseErrorKind::Internal);
                return Err(ParseError::Internal);
            }

            let mut io_buffer = [0u8; IO_BUFFER_SIZE];
            let read = match transport.read(&mut io_buffer) {
                Ok(read) => read,
                Err(e) => {
                    self.fail(ParseErrorKind::Internal);
                    return Err(ParseError::io(e));
                }
            };

            if read > 0 {
                self.feed_body(&io_buffer[..read])?;
                count = self.fill_pending(dst);
            } else {
                // End of stream while reading the body is ordinary completion
                self.complete_message();
            }
        }

        Ok(count)
    }

    /// Reads the entire remaining body into `dst`, returning the total byte
    /// count.
    pub fn read_body_to_end<R: Read>(&mut self, transport: &mut R, dst: &mut BytesMut) -> Result<usize, ParseError> {
        let mut scratch = [0u8; IO_BUFFER_SIZE];
        let mut total = 0;
        loop {
            let read = self.read_body(transport, &mut scratch)?;
            if read == 0 {
                return Ok(total);
            }
            dst.extend_from_slice(&scratch[..read]);
            total += read;
        }
    }

    /// Consumes and discards the rest of the body so the connection can be
    /// reused without the caller materializing bytes it does not want.
    pub fn drain_body<R: Read>(&mut self, transport: &mut R) -> Result<(), ParseError> {
        self.save_body = false;
        while self.state == ParseState::HeadersComplete {
            let mut io_buffer = [0u8; IO_BUFFER_SIZE];
            let read = match transport.read(&mut io_buffer) {
                Ok(read) => read,
                Err(e) => {
                    self.fail(ParseErrorKind::Internal);
                    return Err(ParseError::io(e));
                }
            };

            if read > 0 {
                self.feed_body(&io_buffer[..read])?;
            } else {
                self.complete_message();
            }
        }
        Ok(())
    }

    /// Performs one bounded read and decodes it as UTF-8 text.
    ///
    /// Returns `None` when no bytes were available.
    pub fn read_body_string<R: Read>(&mut self, transport: &mut R) -> Result<Option<String>, ParseError> {
        let mut scratch = [0u8; IO_BUFFER_SIZE];
        let read = self.read_body(transport, &mut scratch)?;
        if read == 0 {
            return Ok(None);
        }
        match str::from_utf8(&scratch[..read]) {
            Ok(text) => Ok(Some(text.to_owned())),
            Err(_) => Err(ParseError::invalid_body("body bytes are not valid utf-8")),
        }
    }

    /// Current state of the message.
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// The connection-persistence judgment, valid once headers are complete
    /// and re-derived at message completion.
    pub fn is_keep_alive(&self) -> bool {
        self.keep_alive
    }

    /// HTTP version, available once headers are complete.
    pub fn version(&self) -> Option<Version> {
        self.version
    }

    /// Request method; `None` for responses (and before the head completes).
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    /// Decoded request target, available once headers are complete.
    pub fn url(&self) -> &str {
        &self.url_string
    }

    /// Raw accumulated request target bytes.
    pub fn url_bytes(&self) -> &[u8] {
        &self.url
    }

    /// Accumulated headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Byte offset within the last fed buffer at which an upgraded protocol
    /// begins, if the tokenizer reported an upgrade.
    pub fn upgrade_offset(&self) -> Option<usize> {
        self.upgrade_offset
    }

    /// Surrenders the tokenizer for reuse on the next message of a
    /// keep-alive connection. `None` if it was already released.
    pub fn into_tokenizer(self) -> Option<T> {
        self.tokenizer
    }

    /// Feeds one range to the tokenizer and dispatches every recognized
    /// event. Events are drained even if one of them fails; the first error
    /// wins.
    fn feed(&mut self, input: &[u8]) -> Result<FeedOutcome, ParseError> {
        let tokenizer = self.tokenizer.as_mut().ok_or(ParseError::Internal)?;
        let mut events = std::mem::take(&mut self.events);
        events.clear();
        let outcome = tokenizer.feed(input, &mut events);

        let mut result = Ok(());
        for event in events.drain(..) {
            if result.is_ok() {
                result = self.on_event(event);
            }
        }
        self.events = events;

        result.map(|()| outcome)
    }

    /// Body-phase variant of [`Self::feed`]: the whole chunk must be
    /// accepted, anything short of that fails the message.
    fn feed_body(&mut self, chunk: &[u8]) -> Result<(), ParseError> {
        let outcome = match self.feed(chunk) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.fail(e.kind());
                return Err(e);
            }
        };

        if !outcome.upgrade && outcome.consumed != chunk.len() {
            self.fail(ParseErrorKind::ParsedLessThanRead);
            return Err(ParseError::ParsedLessThanRead { consumed: outcome.consumed, supplied: chunk.len() });
        }
        Ok(())
    }

    fn on_event(&mut self, event: TokenEvent) -> Result<(), ParseError> {
        match event {
            TokenEvent::MessageBegin => {}
            TokenEvent::Url(bytes) => self.url.extend_from_slice(&bytes),
            TokenEvent::HeaderField(bytes) => self.accumulator.on_field(&bytes, &mut self.headers)?,
            TokenEvent::HeaderValue(bytes) => self.accumulator.on_value(&bytes),
            TokenEvent::HeadersComplete { method, version } => self.complete_headers(method, version)?,
            TokenEvent::Body(bytes) => {
                if self.save_body && !bytes.is_empty() {
                    self.pending_body.push_back(bytes);
                }
            }
            TokenEvent::MessageComplete => self.complete_message(),
        }
        Ok(())
    }

    fn complete_headers(&mut self, method: Option<Method>, version: Version) -> Result<(), ParseError> {
        self.version = Some(version);
        self.method = method;
        self.url_string = String::from_utf8_lossy(&self.url).into_owned();

        // Flush a pair still sitting in the accumulators
        self.accumulator.finish(&mut self.headers)?;

        self.keep_alive = self.tokenizer.as_ref().is_some_and(Tokenizer::is_keep_alive);
        self.state = ParseState::HeadersComplete;
        trace!(url = %self.url_string, keep_alive = self.keep_alive, "headers complete");
        Ok(())
    }

    fn complete_message(&mut self) {
        self.keep_alive = self.tokenizer.as_ref().is_some_and(Tokenizer::is_keep_alive);
        self.state = ParseState::MessageComplete;
        trace!(keep_alive = self.keep_alive, "message complete");
        if !self.keep_alive {
            self.release_tokenizer();
        }
    }

    /// Clears all per-message state and resets the tokenizer grammar,
    /// re-entering [`ParseState::Initial`].
    fn restart(&mut self) {
        self.state = ParseState::Initial;
        self.keep_alive = false;
        self.version = None;
        self.method = None;
        self.url.clear();
        self.url_string.clear();
        self.headers.clear();
        self.accumulator.clear();
        self.pending_body.clear();
        self.save_body = true;
        self.upgrade_offset = None;
        if let Some(tokenizer) = self.tokenizer.as_mut() {
            tokenizer.reset();
        }
    }

    fn fail(&mut self, kind: ParseErrorKind) {
        self.release_tokenizer();
        self.state = ParseState::Failed(kind);
    }

    /// The tokenizer must not outlive a connection that will be closed.
    fn release_tokenizer(&mut self) {
        self.tokenizer = None;
    }

    /// Drains as many queued body bytes as fit into `dst`.
    fn fill_pending(&mut self, dst: &mut [u8]) -> usize {
        let mut copied = 0;
        while copied < dst.len() {
            let Some(chunk) = self.pending_body.front_mut() else {
                break;
            };
            let take = cmp::min(chunk.len(), dst.len() - copied);
            dst[copied..copied + take].copy_from_slice(&chunk[..take]);
            chunk.advance(take);
            copied += take;
            if chunk.is_empty() {
                self.pending_body.pop_front();
            }
        }
        copied
    }
}
