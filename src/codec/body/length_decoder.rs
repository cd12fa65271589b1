//! Decoder for payloads framed by a Content-Length header.

use std::cmp;

use bytes::BytesMut;

use crate::protocol::{ParseError, PayloadItem};

/// Tracks the bytes still owed by a fixed-length payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LengthDecoder {
    remaining: u64,
}

impl LengthDecoder {
    pub(crate) fn new(length: u64) -> Self {
        Self { remaining: length }
    }

    /// Takes up to `remaining` bytes from `src`.
    ///
    /// Returns `Eof` once the declared length has been delivered, a chunk
    /// while bytes are available, or `None` when more data is needed.
    pub(crate) fn decode(&mut self, src: &mut BytesMut) -> Result<Option<PayloadItem>, ParseError> {
        if self.remaining == 0 {
            return Ok(Some(PayloadItem::Eof));
        }

        if src.is_empty() {
            return Ok(None);
        }

        let take = cmp::min(self.remaining, src.len() as u64);
        let bytes = src.split_to(take as usize).freeze();
        self.remaining -= bytes.len() as u64;

        Ok(Some(PayloadItem::Chunk(bytes)))
    }
}
