//! Body framing decoders.
//!
//! Four strategies cover HTTP/1.x payloads: chunked transfer encoding,
//! Content-Length framing, read-until-close (responses without explicit
//! framing), and no body. [`PayloadDecoder`] dispatches to the right one
//! based on the head.

mod chunked_decoder;
mod length_decoder;
mod payload_decoder;

pub(crate) use payload_decoder::PayloadDecoder;
