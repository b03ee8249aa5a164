//! Rich-text (RTE) fields.
//!
//! Contentstack returns RTE content either as pre-rendered HTML (a JSON
//! string) or as a JSON document tree (`{"type": "doc", "children": [...]}`).
//! [`RichText`] accepts both without error and keeps the original form for
//! re-serialization; [`RichText::nodes`] decodes either form into the same
//! [`RteNode`] tree.

use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// An RTE field in whichever form upstream sent it.
#[derive(Debug, Clone, PartialEq)]
pub enum RichText {
    /// Pre-rendered HTML.
    Html(String),
    /// JSON RTE document (or any other non-string JSON value).
    Document(Value),
}

/// One node of a decoded rich-text tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RteNode {
    Element(RteElement),
    Text(RteText),
}

/// Block or inline element (`p`, `h2`, `a`, `li`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RteElement {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub attrs: Map<String, Value>,
    pub children: Vec<RteNode>,
}

/// Text leaf with its formatting marks (`bold`, `italic`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RteText {
    pub text: String,
    #[serde(flatten)]
    pub marks: Map<String, Value>,
}

impl RteNode {
    fn text(text: impl Into<String>, marks: &Map<String, Value>) -> Self {
        RteNode::Text(RteText {
            text: text.into(),
            marks: marks.clone(),
        })
    }

    fn push_text(&self, out: &mut String) {
        match self {
            RteNode::Text(t) => out.push_str(&t.text),
            RteNode::Element(e) => e.children.iter().for_each(|c| c.push_text(out)),
        }
    }
}

impl RichText {
    /// Decode into the common node tree. Never fails; unrecognised JSON
    /// shapes contribute no nodes.
    pub fn nodes(&self) -> Vec<RteNode> {
        match self {
            RichText::Html(html) => html_nodes(html),
            RichText::Document(doc) => document_nodes(doc),
        }
    }

    /// Text content with one line per top-level node.
    pub fn plain_text(&self) -> String {
        self.nodes()
            .iter()
            .map(|node| {
                let mut out = String::new();
                node.push_text(&mut out);
                out
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_html(&self) -> bool {
        matches!(self, RichText::Html(_))
    }
}

impl<'de> Deserialize<'de> for RichText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(html) => RichText::Html(html),
            other => RichText::Document(other),
        })
    }
}

impl Serialize for RichText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RichText::Html(html) => serializer.serialize_str(html),
            RichText::Document(doc) => doc.serialize(serializer),
        }
    }
}

// ---------------------------------------------------------------------------
// JSON RTE documents
// ---------------------------------------------------------------------------

fn document_nodes(doc: &Value) -> Vec<RteNode> {
    match doc {
        Value::Array(items) => items.iter().filter_map(json_node).collect(),
        Value::Object(obj) if obj.get("type").and_then(Value::as_str) == Some("doc") => {
            json_children(obj)
        }
        Value::Object(_) => json_node(doc).into_iter().collect(),
        Value::String(html) => html_nodes(html),
        _ => Vec::new(),
    }
}

fn json_children(obj: &Map<String, Value>) -> Vec<RteNode> {
    obj.get("children")
        .and_then(Value::as_array)
        .map(|children| children.iter().filter_map(json_node).collect())
        .unwrap_or_default()
}

fn json_node(value: &Value) -> Option<RteNode> {
    let obj = value.as_object()?;

    if let Some(text) = obj.get("text").and_then(Value::as_str) {
        let marks = obj
            .iter()
            .filter(|(k, _)| k.as_str() != "text")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        return Some(RteNode::Text(RteText {
            text: text.to_string(),
            marks,
        }));
    }

    let kind = obj.get("type").and_then(Value::as_str)?;
    Some(RteNode::Element(RteElement {
        kind: kind.to_string(),
        uid: obj.get("uid").and_then(Value::as_str).map(str::to_string),
        attrs: obj
            .get("attrs")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        children: json_children(obj),
    }))
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

/// Inline tags that become marks on their text leaves rather than elements.
fn mark_for(tag: &str) -> Option<&'static str> {
    match tag {
        "strong" | "b" => Some("bold"),
        "em" | "i" => Some("italic"),
        "u" => Some("underline"),
        "s" | "strike" | "del" => Some("strikethrough"),
        "code" => Some("inlineCode"),
        "sup" => Some("superscript"),
        "sub" => Some("subscript"),
        _ => None,
    }
}

fn html_nodes(html: &str) -> Vec<RteNode> {
    let fragment = Html::parse_fragment(html);
    html_children(fragment.root_element(), &Map::new())
}

fn html_children(parent: ElementRef<'_>, marks: &Map<String, Value>) -> Vec<RteNode> {
    let mut nodes = Vec::new();

    for child in parent.children() {
        if let Some(element) = ElementRef::wrap(child) {
            let tag = element.value().name();
            if let Some(mark) = mark_for(tag) {
                let mut inner = marks.clone();
                inner.insert(mark.to_string(), Value::Bool(true));
                nodes.extend(html_children(element, &inner));
            } else if tag == "br" {
                nodes.push(RteNode::text("\n", marks));
            } else {
                nodes.push(RteNode::Element(html_element(element, marks)));
            }
        } else if let Node::Text(text) = child.value() {
            let text: &str = text;
            // Whitespace between block tags is layout, not content.
            if text.is_empty() || (text.trim().is_empty() && text.contains('\n')) {
                continue;
            }
            nodes.push(RteNode::text(text, marks));
        }
    }

    nodes
}

fn html_element(element: ElementRef<'_>, marks: &Map<String, Value>) -> RteElement {
    let tag = element.value().name();
    let mut attrs = Map::new();
    for (name, value) in element.value().attrs() {
        attrs.insert(name.to_string(), Value::String(value.to_string()));
    }
    let link = match tag {
        "a" => element.value().attr("href"),
        "img" => element.value().attr("src"),
        _ => None,
    };
    if let Some(url) = link {
        attrs.insert("url".to_string(), Value::String(url.to_string()));
    }

    RteElement {
        kind: tag.to_string(),
        uid: None,
        attrs,
        children: html_children(element, marks),
    }
}
