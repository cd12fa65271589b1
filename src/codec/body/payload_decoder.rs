//! Strategy dispatcher over the body framing decoders.

use bytes::BytesMut;

use crate::codec::body::chunked_decoder::ChunkedDecoder;
use crate::codec::body::length_decoder::LengthDecoder;
use crate::protocol::{ParseError, PayloadItem, PayloadSize};

/// Decodes a message payload with the strategy the head called for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PayloadDecoder {
    kind: Kind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    /// Fixed content length
    Length(LengthDecoder),
    /// Chunked transfer encoding
    Chunked(ChunkedDecoder),
    /// Everything until the peer closes the stream
    UntilClose,
    /// No body
    NoBody,
}

impl PayloadDecoder {
    /// Decodes the next payload item out of `src`.
    ///
    /// `UntilClose` never produces `Eof` on its own; the end of an unbounded
    /// payload is the end of the stream, which only the transport can see.
    pub(crate) fn decode(&mut self, src: &mut BytesMut) -> Result<Option<PayloadItem>, ParseError> {
        match &mut self.kind {
            Kind::Length(decoder) => decoder.decode(src),
            Kind::Chunked(decoder) => decoder.decode(src),
            Kind::UntilClose => {
                if src.is_empty() {
                    Ok(None)
                } else {
                    let bytes = src.split_to(src.len()).freeze();
                    Ok(Some(PayloadItem::Chunk(bytes)))
                }
            }
            Kind::NoBody => Ok(Some(PayloadItem::Eof)),
        }
    }
}

impl From<PayloadSize> for PayloadDecoder {
    fn from(size: PayloadSize) -> Self {
        let kind = match size {
            PayloadSize::Length(0) | PayloadSize::Empty => Kind::NoBody,
            PayloadSize::Length(length) => Kind::Length(LengthDecoder::new(length)),
            PayloadSize::Chunked => Kind::Chunked(ChunkedDecoder::new()),
            PayloadSize::Unbounded => Kind::UntilClose,
        };
        Self { kind }
    }
}
