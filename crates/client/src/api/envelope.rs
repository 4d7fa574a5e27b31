//! Response envelope normalization.
//!
//! The upstream API is inconsistent about how it signals success: some
//! endpoints set `status == "success"`, others set `message == "success"`,
//! and list endpoints omit both. Every gateway decodes the raw shape here
//! and normalizes it into one internal outcome before any business logic
//! inspects it, so the five cart call sites (and everything else) interpret
//! the envelope in exactly one place.

use serde::Deserialize;

/// The marker value both success fields use.
pub(crate) const SUCCESS_MARKER: &str = "success";

/// The `status`/`message` pair present on most envelopes.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct EnvelopeHead {
    /// e.g. `"success"` or `"fail"`.
    pub status: Option<String>,
    /// e.g. `"success"` or a human-readable failure description.
    pub message: Option<String>,
}

impl EnvelopeHead {
    /// A response is successful if either field carries the marker.
    pub(crate) fn is_success(&self) -> bool {
        self.status.as_deref() == Some(SUCCESS_MARKER)
            || self.message.as_deref() == Some(SUCCESS_MARKER)
    }

    /// The server's failure description, when it supplied one.
    ///
    /// `status` values like `"fail"` are markers, not messages, so only the
    /// `message` field is surfaced.
    pub(crate) fn failure_message(self) -> Option<String> {
        self.message.filter(|m| m != SUCCESS_MARKER)
    }
}

/// A bare acknowledgement envelope (head only). Wishlist mutations return
/// ids rather than populated payloads, so only the marker matters.
#[derive(Debug, Deserialize)]
pub(crate) struct AckEnvelope {
    #[serde(flatten)]
    pub head: EnvelopeHead,
}

impl AckEnvelope {
    /// Normalize into success or an optional server message.
    pub(crate) fn into_outcome(self) -> Result<(), Option<String>> {
        if self.head.is_success() {
            Ok(())
        } else {
            Err(self.head.failure_message())
        }
    }
}

/// List envelope used by the catalog endpoints (`data` is an array; the
/// head fields are typically absent on these).
#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope<T> {
    pub data: Option<Vec<T>>,
}

impl<T> ListEnvelope<T> {
    /// The listed items; a missing `data` field decodes as an empty list.
    pub(crate) fn into_items(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

/// Single-item envelope used by the detail endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ItemEnvelope<T> {
    #[serde(flatten)]
    pub head: EnvelopeHead,
    pub data: Option<T>,
}

impl<T> ItemEnvelope<T> {
    /// The item, or the server's failure message when it is absent.
    pub(crate) fn into_outcome(self) -> Result<T, Option<String>> {
        match self.data {
            Some(item) => Ok(item),
            None => Err(self.head.failure_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_status_success_marker() {
        let head: EnvelopeHead =
            serde_json::from_str(r#"{"status":"success"}"#).expect("decode");
        assert!(head.is_success());
    }

    #[test]
    fn accepts_message_success_marker() {
        let head: EnvelopeHead =
            serde_json::from_str(r#"{"message":"success","status":null}"#).expect("decode");
        assert!(head.is_success());
    }

    #[test]
    fn rejects_when_neither_field_matches() {
        let head: EnvelopeHead =
            serde_json::from_str(r#"{"status":"fail","message":"No cart exists"}"#)
                .expect("decode");
        assert!(!head.is_success());
        assert_eq!(head.failure_message().as_deref(), Some("No cart exists"));
    }

    #[test]
    fn status_marker_is_not_surfaced_as_message() {
        let head: EnvelopeHead = serde_json::from_str(r#"{"status":"fail"}"#).expect("decode");
        assert_eq!(head.failure_message(), None);
    }

    #[test]
    fn ack_envelope_normalizes_both_shapes() {
        let ok: AckEnvelope = serde_json::from_str(r#"{"message":"success"}"#).expect("decode");
        assert!(ok.into_outcome().is_ok());

        let err: AckEnvelope =
            serde_json::from_str(r#"{"status":"Error","message":"Invalid id"}"#).expect("decode");
        assert_eq!(err.into_outcome(), Err(Some("Invalid id".to_owned())));
    }

    #[test]
    fn list_envelope_tolerates_missing_data() {
        let list: ListEnvelope<u32> = serde_json::from_str("{}").expect("decode");
        assert!(list.into_items().is_empty());
    }
}
