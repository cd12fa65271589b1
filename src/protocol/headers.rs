//! Header fragment accumulation and the merge policy.
//!
//! The tokenizer delivers header names and values as independent, possibly
//! repeated fragments: a single name or value may arrive split across several
//! events before the pair is complete. The accumulator buffers the current
//! pair and commits it exactly when a new field fragment arrives after a
//! value fragment, or when the head finishes.
//!
//! On commit the merge policy decides between two behaviors: names in a fixed
//! single-value set keep only the first occurrence received (later duplicates
//! are dropped), every other name accumulates all occurrences in arrival
//! order.

use bytes::BytesMut;
use http::HeaderMap;
use http::header::{HeaderName, HeaderValue};
use tracing::trace;

use crate::protocol::ParseError;

/// Header names whose duplicates are dropped rather than merged.
///
/// The set follows the classic Mozilla single-value header list: these carry
/// one authoritative value, so only the first occurrence received is kept.
fn is_single_value(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "content-type"
            | "content-length"
            | "user-agent"
            | "referer"
            | "host"
            | "authorization"
            | "proxy-authorization"
            | "if-modified-since"
            | "if-unmodified-since"
            | "from"
            | "location"
            | "max-forwards"
            | "retry-after"
            | "etag"
            | "last-modified"
            | "server"
            | "age"
            | "expires"
    )
}

/// Buffers the in-flight header pair between fragment events.
#[derive(Debug, Default)]
pub(crate) struct HeaderAccumulator {
    /// Bytes of the header name delivered so far
    field: BytesMut,
    /// Bytes of the header value delivered so far
    value: BytesMut,
    /// Whether the most recent fragment belonged to a value
    last_was_value: bool,
}

impl HeaderAccumulator {
    /// Handles a field-name fragment. A field fragment directly after a value
    /// fragment means the previous pair just completed, so it is committed
    /// first.
    pub(crate) fn on_field(&mut self, fragment: &[u8], headers: &mut HeaderMap) -> Result<(), ParseError> {
        if self.last_was_value {
            self.commit(headers)?;
        }
        self.field.extend_from_slice(fragment);
        self.last_was_value = false;
        Ok(())
    }

    /// Handles a value fragment.
    pub(crate) fn on_value(&mut self, fragment: &[u8]) {
        self.value.extend_from_slice(fragment);
        self.last_was_value = true;
    }

    /// Flushes a still-pending pair when the head finishes.
    pub(crate) fn finish(&mut self, headers: &mut HeaderMap) -> Result<(), ParseError> {
        if self.last_was_value {
            self.commit(headers)?;
        }
        Ok(())
    }

    /// Discards any buffered fragments (message reset).
    pub(crate) fn clear(&mut self) {
        self.field.clear();
        self.value.clear();
        self.last_was_value = false;
    }

    /// Decodes the buffered pair and merges it into the container.
    fn commit(&mut self, headers: &mut HeaderMap) -> Result<(), ParseError> {
        let name = HeaderName::from_bytes(&self.field).map_err(ParseError::invalid_header)?;
        let value = HeaderValue::from_bytes(&self.value).map_err(ParseError::invalid_header)?;

        if is_single_value(&name) && headers.contains_key(&name) {
            trace!(name = %name, "dropped duplicate of single-value header");
        } else {
            headers.append(name, value);
        }

        self.field.clear();
        self.value.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(acc: &mut HeaderAccumulator, headers: &mut HeaderMap, name: &str, value: &str) {
        acc.on_field(name.as_bytes(), headers).unwrap();
        acc.on_value(value.as_bytes());
    }

    #[test]
    fn single_value_keeps_first() {
        let mut acc = HeaderAccumulator::default();
        let mut headers = HeaderMap::new();

        pair(&mut acc, &mut headers, "Host", "x");
        pair(&mut acc, &mut headers, "Host", "y");
        acc.finish(&mut headers).unwrap();

        let values: Vec<_> = headers.get_all("host").iter().collect();
        assert_eq!(values, [&HeaderValue::from_static("x")]);
    }

    #[test]
    fn repeatable_header_keeps_order() {
        let mut acc = HeaderAccumulator::default();
        let mut headers = HeaderMap::new();

        pair(&mut acc, &mut headers, "X-Tag", "a");
        pair(&mut acc, &mut headers, "X-Tag", "b");
        acc.finish(&mut headers).unwrap();

        let values: Vec<_> = headers.get_all("x-tag").iter().collect();
        assert_eq!(values, [&HeaderValue::from_static("a"), &HeaderValue::from_static("b")]);
    }

    #[test]
    fn single_value_set_is_case_insensitive() {
        let mut acc = HeaderAccumulator::default();
        let mut headers = HeaderMap::new();

        pair(&mut acc, &mut headers, "CONTENT-TYPE", "text/plain");
        pair(&mut acc, &mut headers, "content-type", "text/html");
        acc.finish(&mut headers).unwrap();

        assert_eq!(headers.get("content-type"), Some(&HeaderValue::from_static("text/plain")));
        assert_eq!(headers.get_all("content-type").iter().count(), 1);
    }

    #[test]
    fn fragmented_name_and_value_assemble() {
        let mut acc = HeaderAccumulator::default();
        let mut headers = HeaderMap::new();

        acc.on_field(b"X-Fo", &mut headers).unwrap();
        acc.on_field(b"rwarded", &mut headers).unwrap();
        acc.on_value(b"10.0.");
        acc.on_value(b"0.1");
        // the next field fragment commits the completed pair
        acc.on_field(b"Accept", &mut headers).unwrap();
        acc.on_value(b"*/*");
        acc.finish(&mut headers).unwrap();

        assert_eq!(headers.get("x-forwarded"), Some(&HeaderValue::from_static("10.0.0.1")));
        assert_eq!(headers.get("accept"), Some(&HeaderValue::from_static("*/*")));
    }

    #[test]
    fn finish_without_pending_pair_is_noop() {
        let mut acc = HeaderAccumulator::default();
        let mut headers = HeaderMap::new();

        acc.finish(&mut headers).unwrap();
        assert!(headers.is_empty());
    }

    #[test]
    fn clear_discards_partial_pair() {
        let mut acc = HeaderAccumulator::default();
        let mut headers = HeaderMap::new();

        acc.on_field(b"X-Stale", &mut headers).unwrap();
        acc.on_value(b"leftover");
        acc.clear();

        pair(&mut acc, &mut headers, "X-Fresh", "new");
        acc.finish(&mut headers).unwrap();

        assert!(headers.get("x-stale").is_none());
        assert_eq!(headers.get("x-fresh"), Some(&HeaderValue::from_static("new")));
    }

    #[test]
    fn invalid_name_is_rejected() {
        let mut acc = HeaderAccumulator::default();
        let mut headers = HeaderMap::new();

        acc.on_field(b"bad header", &mut headers).unwrap();
        acc.on_value(b"v");
        assert!(acc.finish(&mut headers).is_err());
    }
}
