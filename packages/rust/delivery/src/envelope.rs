//! The `{ "entries": [...], "count": N }` wrapper every entries query returns.

use serde::{Deserialize, Serialize};
use stackbff_shared::{BffError, Result};
use tracing::{info, warn};

/// Raw typed response of an entries query.
///
/// Built fresh per response and usually consumed by [`Envelope::select_first`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<T>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self {
            entries: None,
            count: None,
        }
    }
}

impl<T> Envelope<T> {
    pub fn new(entries: Vec<T>) -> Self {
        let count = entries.len() as u64;
        Self {
            entries: Some(entries),
            count: Some(count),
        }
    }

    /// Number of entries actually present (not the upstream `count`).
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First entry of the response; the rest are discarded.
    ///
    /// One content type, locale and variant resolve to one canonical entry.
    /// Absent or empty `entries` is [`BffError::EmptyResult`].
    pub fn select_first(self, context: &str) -> Result<T> {
        let total = self.len();
        match self.entries.and_then(|entries| entries.into_iter().next()) {
            Some(first) => {
                info!(context, entries = total, "using first entry");
                Ok(first)
            }
            None => {
                warn!(context, "no entries found in response");
                Err(BffError::empty_result(context))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_first_returns_head_and_drops_rest() {
        let envelope = Envelope::new(vec!["x", "y"]);
        assert_eq!(envelope.select_first("pair").unwrap(), "x");
    }

    #[test]
    fn empty_entries_is_empty_result() {
        let err = Envelope::<u32>::new(vec![])
            .select_first("home_page")
            .unwrap_err();
        assert!(matches!(err, BffError::EmptyResult { ref context } if context == "home_page"));
    }

    #[test]
    fn null_or_missing_entries_is_empty_result() {
        for body in [r#"{"entries": null, "count": 0}"#, r#"{"count": 0}"#, "{}"] {
            let envelope: Envelope<serde_json::Value> = serde_json::from_str(body).unwrap();
            assert!(envelope.is_empty());
            let err = envelope.select_first("web_config").unwrap_err();
            assert!(matches!(err, BffError::EmptyResult { .. }), "{body}");
        }
    }

    /// Entry types carry no `Default`; decoding must only need `DeserializeOwned`.
    fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Envelope<T> {
        serde_json::from_str(body).unwrap()
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Slug {
        uid: String,
    }

    #[test]
    fn decodes_entries_without_default() {
        let envelope: Envelope<Slug> = decode(r#"{"entries": [{"uid": "blt1"}], "count": 1}"#);
        assert_eq!(envelope.count, Some(1));
        assert_eq!(envelope.select_first("slug").unwrap().uid, "blt1");

        let missing: Envelope<Slug> = decode("{}");
        assert!(missing.is_empty());
    }

    #[test]
    fn serializes_without_absent_fields() {
        let envelope: Envelope<u8> = Envelope::default();
        assert_eq!(serde_json::to_string(&envelope).unwrap(), "{}");
        let envelope = Envelope::new(vec![1u8, 2]);
        assert_eq!(
            serde_json::to_string(&envelope).unwrap(),
            r#"{"entries":[1,2],"count":2}"#
        );
    }
}
