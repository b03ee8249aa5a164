//! Caller-shaped entries query.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stackbff_delivery::{Pagination, QueryBuilder, QuerySpec};
use stackbff_includes::IncludePathSet;
use stackbff_shared::Result;

/// Generic entries request, as posted by a frontend.
///
/// Field names follow the camelCase JSON body the frontend sends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntryRequest {
    /// Content type to query. Required.
    pub content_type_uid: String,
    pub locale: Option<String>,
    /// Personalization variant.
    pub variant: Option<String>,
    /// Reference paths to resolve inline (`include[]`).
    pub include: IncludePathSet,
    /// Fields to drop from the response (`exclude[]`).
    pub exclude: Vec<String>,
    /// Extra query parameters, sent in insertion order. Null values are
    /// skipped; strings are sent as is and anything else as its JSON text.
    pub query: Map<String, Value>,
    /// Entry URL, for lookups by URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl EntryRequest {
    pub fn new(content_type_uid: impl Into<String>) -> Self {
        Self {
            content_type_uid: content_type_uid.into(),
            ..Self::default()
        }
    }

    /// Build the upstream query. Fails on a blank content type.
    pub fn to_query(&self) -> Result<QuerySpec> {
        let mut builder = QueryBuilder::entries(&self.content_type_uid)
            .locale(self.locale.as_deref())
            .variant(self.variant.as_deref())
            .includes(&self.include)
            .excludes(self.exclude.iter().cloned())
            .pagination(Pagination::from_parts(self.skip, self.limit));

        for (key, value) in &self.query {
            if let Some(text) = param_text(value) {
                builder = builder.param(key, text);
            }
        }

        builder.build()
    }
}

fn param_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stackbff_shared::BffError;

    #[test]
    fn decodes_frontend_body() {
        let request: EntryRequest = serde_json::from_value(json!({
            "contentTypeUid": "article",
            "locale": "en-us",
            "include": ["author", "author", "related"],
            "exclude": ["seo"],
            "skip": 10,
            "limit": 5
        }))
        .unwrap();

        assert_eq!(request.content_type_uid, "article");
        assert_eq!(request.include.len(), 2);
        assert_eq!(request.skip, Some(10));
        assert!(request.query.is_empty());
    }

    #[test]
    fn query_renders_every_part_in_order() {
        let mut request = EntryRequest::new("article");
        request.locale = Some("en-us".into());
        request.variant = Some("cs_personalize_0_1".into());
        request.include = ["author"].into_iter().collect();
        request.exclude = vec!["seo".into()];
        request.skip = Some(0);
        request.limit = Some(20);
        request.query.insert("include_count".into(), json!(true));
        request.query.insert("desc".into(), json!("updated_at"));
        request.query.insert("ignored".into(), Value::Null);

        let spec = request.to_query().unwrap();
        let pairs: Vec<_> = spec
            .query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        assert_eq!(
            pairs,
            [
                "locale=en-us",
                "variant=cs_personalize_0_1",
                "include[]=author",
                "exclude[]=seo",
                "skip=0",
                "limit=20",
                "include_count=true",
                "desc=updated_at",
            ]
        );
    }

    #[test]
    fn half_pagination_is_dropped() {
        let mut request = EntryRequest::new("article");
        request.limit = Some(5);
        let spec = request.to_query().unwrap();
        assert!(spec.query_pairs().iter().all(|(k, _)| *k != "limit"));
    }

    #[test]
    fn object_params_are_sent_as_json_text() {
        let mut request = EntryRequest::new("article");
        request.query.insert("query".into(), json!({ "title": "Hello" }));
        let spec = request.to_query().unwrap();
        assert_eq!(
            spec.query_pairs(),
            [("query", r#"{"title":"Hello"}"#.to_string())]
        );
    }

    #[test]
    fn blank_content_type_is_rejected() {
        let err = EntryRequest::new("  ").to_query().unwrap_err();
        assert!(matches!(err, BffError::InvalidArgument { .. }));
    }
}
