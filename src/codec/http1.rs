//! The stock HTTP/1.x tokenizer.
//!
//! Head recognition is delegated to `httparse`; body framing to the decoders
//! in [`crate::codec::body`]. Fed bytes are buffered until the head is
//! complete, then the head is frozen and every recognized unit is reported as
//! a zero-copy slice of it: message-begin, the url, one field and one value
//! event per header, headers-complete, body fragments, message-complete.
//!
//! Grammar rejection has no channel of its own — the tokenizer reports it by
//! consuming fewer bytes than it was given, per the feed contract. Bytes past
//! the end of a message (or past an upgrade point) are likewise left
//! unconsumed.

use std::mem::MaybeUninit;
use std::str;

use bytes::{Bytes, BytesMut};
use http::{Method, Version};
use httparse::Status;
use tracing::{debug, trace};

use crate::codec::body::PayloadDecoder;
use crate::ensure;
use crate::protocol::{FeedOutcome, ParseError, PayloadItem, PayloadSize, TokenEvent, Tokenizer};

/// Maximum number of headers allowed in a message head
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the entire head
const MAX_HEAD_BYTES: usize = 8 * 1024;

/// No complete head fits in fewer bytes; shorter buffers skip the parser
const MIN_HEAD_BYTES: usize = 14;

/// Whether the tokenizer recognizes a request or a response grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Response,
}

/// Where the tokenizer is within one message.
#[derive(Debug)]
enum Phase {
    /// Accumulating head bytes
    Head,
    /// Decoding the payload
    Body(PayloadDecoder),
    /// Message finished; nothing further is consumed
    Done,
    /// An upgraded protocol owns the stream from here on
    Upgraded,
    /// Grammar rejected the input
    Failed,
}

enum HeadProgress {
    Incomplete,
    Complete,
    Upgrade,
}

/// httparse-backed [`Tokenizer`] for HTTP/1.0 and HTTP/1.1 messages.
#[derive(Debug)]
pub struct Http1Tokenizer {
    kind: MessageKind,
    phase: Phase,
    buffer: BytesMut,
    keep_alive: bool,
}

impl Http1Tokenizer {
    pub fn new(kind: MessageKind) -> Self {
        Self { kind, phase: Phase::Head, buffer: BytesMut::new(), keep_alive: false }
    }

    /// Runs the head and body stages as far as the buffered bytes allow,
    /// returning whether an upgrade was requested.
    fn advance(&mut self, events: &mut Vec<TokenEvent>) -> Result<bool, ParseError> {
        if matches!(self.phase, Phase::Head) {
            let progress = match self.kind {
                MessageKind::Request => self.parse_request_head(events)?,
                MessageKind::Response => self.parse_response_head(events)?,
            };
            match progress {
                HeadProgress::Incomplete => return Ok(false),
                HeadProgress::Upgrade => {
                    self.phase = Phase::Upgraded;
                    return Ok(true);
                }
                HeadProgress::Complete => {}
            }
        }

        let mut finished = false;
        if let Phase::Body(decoder) = &mut self.phase {
            loop {
                match decoder.decode(&mut self.buffer)? {
                    Some(PayloadItem::Chunk(bytes)) => events.push(TokenEvent::Body(bytes)),
                    Some(PayloadItem::Eof) => {
                        finished = true;
                        break;
                    }
                    None => break,
                }
            }
        }

        if finished {
            events.push(TokenEvent::MessageComplete);
            self.phase = Phase::Done;
        }

        Ok(false)
    }

    fn parse_request_head(&mut self, events: &mut Vec<TokenEvent>) -> Result<HeadProgress, ParseError> {
        if self.buffer.len() < MIN_HEAD_BYTES {
            return Ok(HeadProgress::Incomplete);
        }

        // Empty request parser plus uninitialized headers array; httparse
        // fills only what it parses
        let mut req = httparse::Request::new(&mut []);
        let mut headers: [MaybeUninit<httparse::Header>; MAX_HEADER_NUM] = unsafe { MaybeUninit::uninit().assume_init() };

        let parsed = req.parse_with_uninit_headers(&self.buffer, &mut headers).map_err(|e| match e {
            httparse::Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
            e => ParseError::invalid_header(e.to_string()),
        })?;

        let head_len = match parsed {
            Status::Complete(head_len) => head_len,
            Status::Partial => {
                ensure!(self.buffer.len() <= MAX_HEAD_BYTES, ParseError::too_large_header(self.buffer.len(), MAX_HEAD_BYTES));
                return Ok(HeadProgress::Incomplete);
            }
        };

        trace!(head_len, "parsed request head");
        ensure!(head_len <= MAX_HEAD_BYTES, ParseError::too_large_header(head_len, MAX_HEAD_BYTES));

        let header_count = req.headers.len();
        ensure!(header_count <= MAX_HEADER_NUM, ParseError::too_many_headers(header_count));

        let version = decode_version(req.version)?;
        let method = req
            .method
            .ok_or(ParseError::InvalidMethod)
            .and_then(|m| Method::from_bytes(m.as_bytes()).map_err(|_| ParseError::InvalidMethod))?;

        // Record byte ranges now; the slices die when the head is split off
        let path = req.path.ok_or(ParseError::InvalidUri)?;
        let path_index = index_of(&self.buffer, path.as_bytes());

        let mut header_index: [HeaderIndex; MAX_HEADER_NUM] = EMPTY_HEADER_INDEX_ARRAY;
        HeaderIndex::record(&self.buffer, req.headers, &mut header_index);

        let framing = Framing::scan(req.headers)?;

        let head = self.buffer.split_to(head_len).freeze();

        events.push(TokenEvent::MessageBegin);
        events.push(TokenEvent::Url(head.slice(path_index.0..path_index.1)));
        push_header_events(&head, &header_index[..header_count], events);
        events.push(TokenEvent::HeadersComplete { method: Some(method.clone()), version });

        self.keep_alive = framing.keep_alive(version);

        if framing.upgrade || method == Method::CONNECT {
            trace!("upgrade requested");
            return Ok(HeadProgress::Upgrade);
        }

        let payload = framing.request_payload()?;
        self.phase = Phase::Body(PayloadDecoder::from(payload));

        Ok(HeadProgress::Complete)
    }

    fn parse_response_head(&mut self, events: &mut Vec<TokenEvent>) -> Result<HeadProgress, ParseError> {
        if self.buffer.len() < MIN_HEAD_BYTES {
            return Ok(HeadProgress::Incomplete);
        }

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut resp = httparse::Response::new(&mut headers);

        let parsed = resp.parse(&self.buffer).map_err(|e| match e {
            httparse::Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
            e => ParseError::invalid_header(e.to_string()),
        })?;

        let head_len = match parsed {
            Status::Complete(head_len) => head_len,
            Status::Partial => {
                ensure!(self.buffer.len() <= MAX_HEAD_BYTES, ParseError::too_large_header(self.buffer.len(), MAX_HEAD_BYTES));
                return Ok(HeadProgress::Incomplete);
            }
        };

        trace!(head_len, "parsed response head");
        ensure!(head_len <= MAX_HEAD_BYTES, ParseError::too_large_header(head_len, MAX_HEAD_BYTES));

        let header_count = resp.headers.len();
        let version = decode_version(resp.version)?;
        let code = resp.code.ok_or_else(|| ParseError::invalid_header("missing status code"))?;

        let mut header_index: [HeaderIndex; MAX_HEADER_NUM] = EMPTY_HEADER_INDEX_ARRAY;
        HeaderIndex::record(&self.buffer, resp.headers, &mut header_index);

        let framing = Framing::scan(resp.headers)?;

        let head = self.buffer.split_to(head_len).freeze();

        events.push(TokenEvent::MessageBegin);
        push_header_events(&head, &header_index[..header_count], events);
        events.push(TokenEvent::HeadersComplete { method: None, version });

        let payload = framing.response_payload(code)?;
        // a read-until-close body leaves nothing for a next message
        self.keep_alive = framing.keep_alive(version) && !payload.is_unbounded();

        if code == 101 {
            trace!("upgrade requested");
            return Ok(HeadProgress::Upgrade);
        }

        self.phase = Phase::Body(PayloadDecoder::from(payload));

        Ok(HeadProgress::Complete)
    }
}

impl Tokenizer for Http1Tokenizer {
    fn feed(&mut self, input: &[u8], events: &mut Vec<TokenEvent>) -> FeedOutcome {
        if matches!(self.phase, Phase::Done | Phase::Upgraded | Phase::Failed) {
            return FeedOutcome { consumed: 0, upgrade: matches!(self.phase, Phase::Upgraded) };
        }

        self.buffer.extend_from_slice(input);

        match self.advance(events) {
            Ok(upgrade) => {
                let consumed = match self.phase {
                    Phase::Done | Phase::Upgraded => {
                        // bytes past the end of the message are not ours
                        let leftover = self.buffer.len();
                        self.buffer.clear();
                        input.len().saturating_sub(leftover)
                    }
                    _ => input.len(),
                };
                FeedOutcome { consumed, upgrade }
            }
            Err(e) => {
                debug!(error = %e, "rejected input");
                self.phase = Phase::Failed;
                self.buffer.clear();
                FeedOutcome { consumed: 0, upgrade: false }
            }
        }
    }

    fn reset(&mut self) {
        self.phase = Phase::Head;
        self.buffer.clear();
        self.keep_alive = false;
    }

    fn is_keep_alive(&self) -> bool {
        self.keep_alive
    }
}

/// Byte range of `slice` within `buffer`, recorded so head events can be
/// zero-copy slices of the frozen head.
fn index_of(buffer: &[u8], slice: &[u8]) -> (usize, usize) {
    let start = slice.as_ptr() as usize - buffer.as_ptr() as usize;
    (start, start + slice.len())
}

/// Byte ranges of one parsed header's name and value.
#[derive(Clone, Copy)]
struct HeaderIndex {
    name: (usize, usize),
    value: (usize, usize),
}

const EMPTY_HEADER_INDEX: HeaderIndex = HeaderIndex { name: (0, 0), value: (0, 0) };

const EMPTY_HEADER_INDEX_ARRAY: [HeaderIndex; MAX_HEADER_NUM] = [EMPTY_HEADER_INDEX; MAX_HEADER_NUM];

impl HeaderIndex {
    fn record(bytes: &[u8], headers: &[httparse::Header<'_>], indices: &mut [HeaderIndex]) {
        for (header, index) in headers.iter().zip(indices.iter_mut()) {
            index.name = index_of(bytes, header.name.as_bytes());
            index.value = index_of(bytes, header.value);
        }
    }
}

fn push_header_events(head: &Bytes, indices: &[HeaderIndex], events: &mut Vec<TokenEvent>) {
    for index in indices {
        events.push(TokenEvent::HeaderField(head.slice(index.name.0..index.name.1)));
        events.push(TokenEvent::HeaderValue(head.slice(index.value.0..index.value.1)));
    }
}

fn decode_version(version: Option<u8>) -> Result<Version, ParseError> {
    match version {
        Some(0) => Ok(Version::HTTP_10),
        Some(1) => Ok(Version::HTTP_11),
        // HTTP/2 and HTTP/3 heads are not expressed in this grammar
        v => Err(ParseError::InvalidVersion(v)),
    }
}

/// Framing-relevant facts scanned out of the head before it is frozen.
#[derive(Debug, Default)]
struct Framing {
    content_length: Option<u64>,
    has_transfer_encoding: bool,
    chunked: bool,
    connection_close: bool,
    connection_keep_alive: bool,
    upgrade: bool,
}

impl Framing {
    fn scan(headers: &[httparse::Header<'_>]) -> Result<Self, ParseError> {
        let mut framing = Self::default();
        let mut connection_upgrade = false;
        let mut has_upgrade_header = false;

        for header in headers {
            if header.name.eq_ignore_ascii_case("content-length") {
                let text =
                    str::from_utf8(header.value).map_err(|_| ParseError::invalid_content_length("value is not valid utf-8"))?;
                let length = text
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ParseError::invalid_content_length(format!("value {text} is not u64")))?;
                framing.content_length = Some(length);
            } else if header.name.eq_ignore_ascii_case("transfer-encoding") {
                framing.has_transfer_encoding = true;
                framing.chunked = is_chunked(header.value);
            } else if header.name.eq_ignore_ascii_case("connection") {
                framing.connection_close |= has_token(header.value, b"close");
                framing.connection_keep_alive |= has_token(header.value, b"keep-alive");
                connection_upgrade |= has_token(header.value, b"upgrade");
            } else if header.name.eq_ignore_ascii_case("upgrade") {
                has_upgrade_header = true;
            }
        }

        framing.upgrade = connection_upgrade && has_upgrade_header;
        Ok(framing)
    }

    /// Connection persistence per RFC 9112 §9.3.
    fn keep_alive(&self, version: Version) -> bool {
        if version == Version::HTTP_11 {
            !self.connection_close
        } else if version == Version::HTTP_10 {
            self.connection_keep_alive
        } else {
            false
        }
    }

    /// Requests without framing headers have no body.
    fn request_payload(&self) -> Result<PayloadSize, ParseError> {
        self.body_framing(PayloadSize::Empty)
    }

    /// Responses without framing headers run until the stream closes, except
    /// for the status codes that never carry a body.
    fn response_payload(&self, code: u16) -> Result<PayloadSize, ParseError> {
        if matches!(code, 100..=199 | 204 | 304) {
            return Ok(PayloadSize::Empty);
        }
        self.body_framing(PayloadSize::Unbounded)
    }

    // refer: https://www.rfc-editor.org/rfc/rfc9112.html#name-transfer-encoding
    fn body_framing(&self, fallback: PayloadSize) -> Result<PayloadSize, ParseError> {
        match (self.has_transfer_encoding, self.content_length) {
            (true, Some(_)) => {
                Err(ParseError::invalid_content_length("transfer-encoding and content-length both present in headers"))
            }
            (true, None) => {
                if self.chunked {
                    Ok(PayloadSize::Chunked)
                } else {
                    Ok(fallback)
                }
            }
            (false, Some(length)) => Ok(PayloadSize::Length(length)),
            (false, None) => Ok(fallback),
        }
    }
}

/// Chunked must be the final encoding if present (RFC 9112 §6.1).
fn is_chunked(value: &[u8]) -> bool {
    value.rsplit(|b| *b == b',').next().is_some_and(|token| token.trim_ascii().eq_ignore_ascii_case(b"chunked"))
}

fn has_token(value: &[u8], token: &[u8]) -> bool {
    value.split(|b| *b == b',').any(|t| t.trim_ascii().eq_ignore_ascii_case(token))
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn feed_all(tokenizer: &mut Http1Tokenizer, input: &[u8]) -> (FeedOutcome, Vec<TokenEvent>) {
        let mut events = Vec::new();
        let outcome = tokenizer.feed(input, &mut events);
        (outcome, events)
    }

    #[test]
    fn request_head_produces_ordered_events() {
        let raw = indoc! {r"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "};

        let mut tokenizer = Http1Tokenizer::new(MessageKind::Request);
        let (outcome, events) = feed_all(&mut tokenizer, raw.as_bytes());

        assert_eq!(outcome.consumed, raw.len());
        assert!(!outcome.upgrade);

        assert_eq!(events[0], TokenEvent::MessageBegin);
        assert_eq!(events[1], TokenEvent::Url(Bytes::from_static(b"/index.html")));
        assert_eq!(events[2], TokenEvent::HeaderField(Bytes::from_static(b"Host")));
        assert_eq!(events[3], TokenEvent::HeaderValue(Bytes::from_static(b"127.0.0.1:8080")));
        assert_eq!(events[4], TokenEvent::HeaderField(Bytes::from_static(b"User-Agent")));
        assert_eq!(events[5], TokenEvent::HeaderValue(Bytes::from_static(b"curl/7.79.1")));
        assert_eq!(events[6], TokenEvent::HeaderField(Bytes::from_static(b"Accept")));
        assert_eq!(events[7], TokenEvent::HeaderValue(Bytes::from_static(b"*/*")));
        assert_eq!(events[8], TokenEvent::HeadersComplete { method: Some(Method::GET), version: Version::HTTP_11 });
        // GET without framing headers has no body
        assert_eq!(events[9], TokenEvent::MessageComplete);
        assert_eq!(events.len(), 10);

        assert!(tokenizer.is_keep_alive());
    }

    #[test]
    fn head_split_byte_by_byte() {
        let raw: &[u8] = b"GET /a HTTP/1.1\r\nHost: x\r\n\r\n";
        let mut tokenizer = Http1Tokenizer::new(MessageKind::Request);
        let mut events = Vec::new();

        for byte in raw {
            let outcome = tokenizer.feed(std::slice::from_ref(byte), &mut events);
            assert_eq!(outcome.consumed, 1);
        }

        assert!(events.contains(&TokenEvent::Url(Bytes::from_static(b"/a"))));
        assert!(events.contains(&TokenEvent::MessageComplete));
    }

    #[test]
    fn request_body_follows_content_length() {
        let mut tokenizer = Http1Tokenizer::new(MessageKind::Request);
        let raw: &[u8] = b"POST /d HTTP/1.1\r\nContent-Length: 4\r\n\r\nwxyz";
        let (outcome, events) = feed_all(&mut tokenizer, raw);

        assert_eq!(outcome.consumed, raw.len());
        assert!(events.contains(&TokenEvent::Body(Bytes::from_static(b"wxyz"))));
        assert_eq!(events.last(), Some(&TokenEvent::MessageComplete));
    }

    #[test]
    fn connection_close_defeats_keep_alive() {
        let mut tokenizer = Http1Tokenizer::new(MessageKind::Request);
        feed_all(&mut tokenizer, b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n");
        assert!(!tokenizer.is_keep_alive());
    }

    #[test]
    fn http_10_needs_explicit_keep_alive() {
        let mut tokenizer = Http1Tokenizer::new(MessageKind::Request);
        feed_all(&mut tokenizer, b"GET / HTTP/1.0\r\n\r\n");
        assert!(!tokenizer.is_keep_alive());

        let mut tokenizer = Http1Tokenizer::new(MessageKind::Request);
        feed_all(&mut tokenizer, b"GET / HTTP/1.0\r\nConnection: keep-alive\r\n\r\n");
        assert!(tokenizer.is_keep_alive());
    }

    #[test]
    fn chunked_must_be_the_last_encoding() {
        let mut tokenizer = Http1Tokenizer::new(MessageKind::Request);
        let raw: &[u8] = b"POST / HTTP/1.1\r\nTransfer-Encoding: gzip, chunked\r\n\r\n3\r\nabc\r\n0\r\n\r\n";
        let (outcome, events) = feed_all(&mut tokenizer, raw);

        assert_eq!(outcome.consumed, raw.len());
        assert!(events.contains(&TokenEvent::Body(Bytes::from_static(b"abc"))));
        assert_eq!(events.last(), Some(&TokenEvent::MessageComplete));
    }

    #[test]
    fn conflicting_framing_headers_are_rejected() {
        let mut tokenizer = Http1Tokenizer::new(MessageKind::Request);
        let raw: &[u8] = b"POST / HTTP/1.1\r\nContent-Length: 3\r\nTransfer-Encoding: chunked\r\n\r\n";
        let (outcome, _) = feed_all(&mut tokenizer, raw);

        assert_eq!(outcome.consumed, 0);
    }

    #[test]
    fn upgrade_stops_at_the_head_boundary() {
        let head: &[u8] = b"GET /chat HTTP/1.1\r\nConnection: Upgrade\r\nUpgrade: websocket\r\n\r\n";
        let raw = [head, b"\x00\x01\x02"].concat();

        let mut tokenizer = Http1Tokenizer::new(MessageKind::Request);
        let (outcome, events) = feed_all(&mut tokenizer, &raw);

        assert!(outcome.upgrade);
        assert_eq!(outcome.consumed, head.len());
        assert!(!events.contains(&TokenEvent::MessageComplete));
    }

    #[test]
    fn connect_is_an_upgrade() {
        let mut tokenizer = Http1Tokenizer::new(MessageKind::Request);
        let (outcome, _) = feed_all(&mut tokenizer, b"CONNECT example.test:443 HTTP/1.1\r\nHost: example.test\r\n\r\n");
        assert!(outcome.upgrade);
    }

    #[test]
    fn pipelined_bytes_are_left_unconsumed() {
        let first: &[u8] = b"GET /1 HTTP/1.1\r\nHost: x\r\n\r\n";
        let raw = [first, b"GET /2 HTTP/1.1\r\n"].concat();

        let mut tokenizer = Http1Tokenizer::new(MessageKind::Request);
        let (outcome, _) = feed_all(&mut tokenizer, &raw);

        assert_eq!(outcome.consumed, first.len());
    }

    #[test]
    fn response_head_has_no_method() {
        let mut tokenizer = Http1Tokenizer::new(MessageKind::Response);
        let raw: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok";
        let (outcome, events) = feed_all(&mut tokenizer, raw);

        assert_eq!(outcome.consumed, raw.len());
        assert!(events.contains(&TokenEvent::HeadersComplete { method: None, version: Version::HTTP_11 }));
        assert!(events.contains(&TokenEvent::Body(Bytes::from_static(b"ok"))));
        assert_eq!(events.last(), Some(&TokenEvent::MessageComplete));
    }

    #[test]
    fn interim_response_has_no_body() {
        let mut tokenizer = Http1Tokenizer::new(MessageKind::Response);
        let raw: &[u8] = b"HTTP/1.1 100 Continue\r\n\r\n";
        let (outcome, events) = feed_all(&mut tokenizer, raw);

        assert_eq!(outcome.consumed, raw.len());
        assert_eq!(events.last(), Some(&TokenEvent::MessageComplete));
        assert!(tokenizer.is_keep_alive());
    }

    #[test]
    fn unframed_response_body_runs_until_close() {
        let mut tokenizer = Http1Tokenizer::new(MessageKind::Response);
        let raw: &[u8] = b"HTTP/1.0 200 OK\r\n\r\nsome bytes";
        let (outcome, events) = feed_all(&mut tokenizer, raw);

        assert_eq!(outcome.consumed, raw.len());
        assert!(events.contains(&TokenEvent::Body(Bytes::from_static(b"some bytes"))));
        // only the transport can see the end of this body
        assert!(!events.contains(&TokenEvent::MessageComplete));
        assert!(!tokenizer.is_keep_alive());
    }

    #[test]
    fn switching_protocols_is_an_upgrade() {
        let mut tokenizer = Http1Tokenizer::new(MessageKind::Response);
        let (outcome, _) = feed_all(&mut tokenizer, b"HTTP/1.1 101 Switching Protocols\r\nUpgrade: websocket\r\n\r\n");
        assert!(outcome.upgrade);
    }

    #[test]
    fn reset_prepares_the_next_message() {
        let mut tokenizer = Http1Tokenizer::new(MessageKind::Request);
        feed_all(&mut tokenizer, b"GET /1 HTTP/1.1\r\nHost: x\r\n\r\n");

        // finished: further input is refused until the reset
        let (outcome, _) = feed_all(&mut tokenizer, b"GET /2 HTTP/1.1\r\nHost: x\r\n\r\n");
        assert_eq!(outcome.consumed, 0);

        tokenizer.reset();
        let (outcome, events) = feed_all(&mut tokenizer, b"GET /2 HTTP/1.1\r\nHost: x\r\n\r\n");
        assert_eq!(outcome.consumed, 28);
        assert!(events.contains(&TokenEvent::Url(Bytes::from_static(b"/2"))));
    }

    #[test]
    fn garbage_is_rejected_with_a_short_consume() {
        let mut tokenizer = Http1Tokenizer::new(MessageKind::Request);
        let (outcome, _) = feed_all(&mut tokenizer, b"\x13\x37 definitely not http\r\n\r\n");
        assert_eq!(outcome.consumed, 0);
    }

    #[test]
    fn oversized_head_is_rejected() {
        let mut tokenizer = Http1Tokenizer::new(MessageKind::Request);
        let mut raw = Vec::from(&b"GET / HTTP/1.1\r\nX-Filler: "[..]);
        raw.extend(std::iter::repeat_n(b'a', MAX_HEAD_BYTES));

        let (outcome, _) = feed_all(&mut tokenizer, &raw);
        assert_eq!(outcome.consumed, 0);
    }
}
