//! Default HTTP/1.x tokenizer and its body framing decoders.
//!
//! The [`Http1Tokenizer`] recognizes the message head with `httparse` and
//! frames the body with the decoders in [`body`], reporting everything it
//! recognizes as [`crate::protocol::TokenEvent`]s. The assembler depends only
//! on the [`crate::protocol::Tokenizer`] trait, so alternative tokenizers can
//! be dropped in; this one is the crate's stock implementation.

mod body;
mod http1;

pub use http1::Http1Tokenizer;
pub use http1::MessageKind;
