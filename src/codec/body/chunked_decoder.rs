//! Decoder for chunked transfer encoding (RFC 9112 §7.1).
//!
//! Each chunk carries its size in hex, optionally followed by extensions,
//! then the data and a CRLF; a zero-sized chunk ends the message, optionally
//! preceded by trailer fields which are read and ignored.

use bytes::{Buf, Bytes, BytesMut};
use tracing::trace;

use crate::protocol::{ParseError, PayloadItem};

use ChunkedState::*;

/// Incremental chunked-coding state machine.
///
/// The decoder never buffers chunk data: it slices whatever is available out
/// of the source and keeps a running count of what the current chunk still
/// owes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChunkedDecoder {
    state: ChunkedState,
    remaining: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkedState {
    /// Hex digits of the chunk size
    Size,
    /// Whitespace after the size
    SizeLws,
    /// Chunk extensions, skipped
    Extension,
    /// LF closing the size line
    SizeLf,
    /// Chunk data
    Body,
    /// CR after chunk data
    BodyCr,
    /// LF after chunk data
    BodyLf,
    /// Trailer field, skipped
    Trailer,
    /// LF closing a trailer field
    TrailerLf,
    /// CR of the final empty line
    EndCr,
    /// LF of the final empty line
    EndLf,
    /// Message fully decoded
    End,
}

/// Pulls the next byte or bails out until more data arrives.
macro_rules! next_byte {
    ($src:ident) => {{
        if $src.is_empty() {
            return Ok(None);
        }
        $src.get_u8()
    }};
}

impl ChunkedDecoder {
    pub(crate) fn new() -> Self {
        Self { state: Size, remaining: 0 }
    }

    /// Advances the state machine over `src`.
    ///
    /// Returns a data chunk as soon as one is available, `Eof` once the
    /// terminating chunk (and trailers) have been read, or `None` when more
    /// data is needed.
    pub(crate) fn decode(&mut self, src: &mut BytesMut) -> Result<Option<PayloadItem>, ParseError> {
        loop {
            if self.state == End {
                trace!("finished reading chunked data");
                return Ok(Some(PayloadItem::Eof));
            }

            if src.is_empty() {
                return Ok(None);
            }

            let mut chunk = None;
            self.state = match self.state.step(src, &mut self.remaining, &mut chunk)? {
                Some(next) => next,
                None => return Ok(None),
            };

            if let Some(bytes) = chunk {
                trace!(len = bytes.len(), "read chunked bytes");
                return Ok(Some(PayloadItem::Chunk(bytes)));
            }
        }
    }
}

impl ChunkedState {
    /// One transition of the machine. `None` means the source ran dry before
    /// the transition could complete.
    fn step(self, src: &mut BytesMut, remaining: &mut u64, chunk: &mut Option<Bytes>) -> Result<Option<Self>, ParseError> {
        match self {
            Size => Self::read_size(src, remaining),
            SizeLws => Self::read_size_lws(src),
            Extension => Self::read_extension(src),
            SizeLf => Self::read_size_lf(src, *remaining),
            Body => Self::read_body(src, remaining, chunk),
            BodyCr => Self::expect(src, b'\r', BodyLf, "chunk data must end with CRLF"),
            BodyLf => Self::expect(src, b'\n', Size, "chunk data must end with CRLF"),
            Trailer => Self::read_trailer(src),
            TrailerLf => Self::expect(src, b'\n', EndCr, "trailer line must end with CRLF"),
            EndCr => Self::read_end_cr(src),
            EndLf => Self::expect(src, b'\n', End, "chunked body must end with CRLF"),
            End => Ok(Some(End)),
        }
    }

    /// Accumulates hex size digits until a delimiter shows up.
    fn read_size(src: &mut BytesMut, size: &mut u64) -> Result<Option<Self>, ParseError> {
        let digit = match next_byte!(src) {
            b @ b'0'..=b'9' => u64::from(b - b'0'),
            b @ b'a'..=b'f' => u64::from(b + 10 - b'a'),
            b @ b'A'..=b'F' => u64::from(b + 10 - b'A'),
            b'\t' | b' ' => return Ok(Some(SizeLws)),
            b';' => return Ok(Some(Extension)),
            b'\r' => return Ok(Some(SizeLf)),
            _ => return Err(ParseError::invalid_body("invalid chunk size line")),
        };

        *size = size
            .checked_mul(16)
            .and_then(|s| s.checked_add(digit))
            .ok_or_else(|| ParseError::invalid_body("chunk size overflows u64"))?;

        Ok(Some(Size))
    }

    /// Whitespace may follow the size, but no more digits can come.
    fn read_size_lws(src: &mut BytesMut) -> Result<Option<Self>, ParseError> {
        match next_byte!(src) {
            b'\t' | b' ' => Ok(Some(SizeLws)),
            b';' => Ok(Some(Extension)),
            b'\r' => Ok(Some(SizeLf)),
            _ => Err(ParseError::invalid_body("invalid whitespace after chunk size")),
        }
    }

    /// Extensions are ignored; they end at the next CRLF. A bare LF is
    /// rejected so that sloppy peers cannot smuggle a line ending past us.
    fn read_extension(src: &mut BytesMut) -> Result<Option<Self>, ParseError> {
        match next_byte!(src) {
            b'\r' => Ok(Some(SizeLf)),
            b'\n' => Err(ParseError::invalid_body("chunk extension contains a bare newline")),
            _ => Ok(Some(Extension)),
        }
    }

    /// A zero size after the final LF means the last chunk was read.
    fn read_size_lf(src: &mut BytesMut, size: u64) -> Result<Option<Self>, ParseError> {
        match next_byte!(src) {
            b'\n' if size == 0 => Ok(Some(EndCr)),
            b'\n' => Ok(Some(Body)),
            _ => Err(ParseError::invalid_body("chunk size line must end with LF")),
        }
    }

    /// Slices out as much of the current chunk as the source holds.
    fn read_body(src: &mut BytesMut, remaining: &mut u64, chunk: &mut Option<Bytes>) -> Result<Option<Self>, ParseError> {
        if src.is_empty() {
            return Ok(Some(Body));
        }

        if *remaining == 0 {
            return Ok(Some(BodyCr));
        }

        // cap at usize on 32-bit targets
        let wanted = usize::try_from(*remaining).unwrap_or(usize::MAX);
        let take = std::cmp::min(wanted, src.len());

        *remaining -= take as u64;
        *chunk = Some(src.split_to(take).freeze());

        if *remaining > 0 { Ok(Some(Body)) } else { Ok(Some(BodyCr)) }
    }

    /// Anything other than the final CR here is a trailer field.
    fn read_end_cr(src: &mut BytesMut) -> Result<Option<Self>, ParseError> {
        match next_byte!(src) {
            b'\r' => Ok(Some(EndLf)),
            _ => Ok(Some(Trailer)),
        }
    }

    fn read_trailer(src: &mut BytesMut) -> Result<Option<Self>, ParseError> {
        match next_byte!(src) {
            b'\r' => Ok(Some(TrailerLf)),
            _ => Ok(Some(Trailer)),
        }
    }

    /// A single mandatory byte; anything else is a framing error.
    fn expect(src: &mut BytesMut, byte: u8, next: Self, reason: &str) -> Result<Option<Self>, ParseError> {
        if next_byte!(src) == byte { Ok(Some(next)) } else { Err(ParseError::invalid_body(reason)) }
    }
}
