use std::io;
use thiserror::Error;

/// Terminal failure kinds for the per-message state machine.
///
/// Once one of these is reached the message is unusable: the tokenizer has
/// been released and no further bytes are processed. Retrying, if any, is a
/// decision for the owning connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No tokenizer (or collaborator) was available — a lifecycle fault.
    Internal,
    /// A zero-length feed arrived while more data was expected.
    UnexpectedEof,
    /// The tokenizer rejected or only partially consumed a non-empty buffer.
    ParsedLessThanRead,
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("tokenizer is not available")]
    Internal,

    #[error("unexpected end of stream while a message was expected")]
    UnexpectedEof,

    #[error("tokenizer consumed {consumed} of {supplied} bytes")]
    ParsedLessThanRead { consumed: usize, supplied: usize },

    #[error("head size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid http version: {0:?}")]
    InvalidVersion(Option<u8>),

    #[error("invalid http method")]
    InvalidMethod,

    #[error("invalid http uri")]
    InvalidUri,

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// The terminal state-machine kind this error collapses to.
    ///
    /// Grammar and header/body rejections are all short-consume failures from
    /// the state machine's point of view; I/O and lifecycle faults are
    /// internal.
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            Self::Internal | Self::Io { .. } => ParseErrorKind::Internal,
            Self::UnexpectedEof => ParseErrorKind::UnexpectedEof,
            _ => ParseErrorKind::ParsedLessThanRead,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_collapse() {
        assert_eq!(ParseError::Internal.kind(), ParseErrorKind::Internal);
        assert_eq!(ParseError::io(io::Error::new(io::ErrorKind::ConnectionReset, "reset")).kind(), ParseErrorKind::Internal);
        assert_eq!(ParseError::UnexpectedEof.kind(), ParseErrorKind::UnexpectedEof);
        assert_eq!(ParseError::ParsedLessThanRead { consumed: 1, supplied: 2 }.kind(), ParseErrorKind::ParsedLessThanRead);
        assert_eq!(ParseError::invalid_header("bad").kind(), ParseErrorKind::ParsedLessThanRead);
        assert_eq!(ParseError::invalid_content_length("bad").kind(), ParseErrorKind::ParsedLessThanRead);
    }
}
