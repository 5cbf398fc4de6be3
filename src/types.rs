use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// System metadata the Delivery API attaches to every content item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ItemSystem {
    pub id: String,
    pub name: String,
    pub codename: String,
    #[serde(default)]
    pub language: String,
    #[serde(rename = "type", default)]
    pub content_type: String,
    #[serde(default)]
    pub last_modified: String,
}

/// One named element of a content item. `value` is kept as raw JSON because its
/// shape depends on the element type (text, number, multiple choice, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    #[serde(rename = "type", default)]
    pub element_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl Element {
    /// Raw textual value, possibly still containing markup.
    pub fn raw_text(&self) -> String {
        value_to_text(&self.value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ContentItem {
    pub system: ItemSystem,
    #[serde(default)]
    pub elements: HashMap<String, Element>,
}

impl ContentItem {
    /// Raw value of an element, `None` when the item does not carry it.
    pub fn raw_element(&self, codename: &str) -> Option<String> {
        self.elements.get(codename).map(Element::raw_text)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct Pagination {
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next_page: Option<String>,
}

/// One page of the `/items` listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ItemsPage {
    #[serde(default)]
    pub items: Vec<ContentItem>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Error body returned by the Delivery API on non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}

fn value_to_text(v: &serde_json::Value) -> String {
    use serde_json::Value;
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // multiple choice / taxonomy entries carry a name, linked items are plain codenames
        Value::Array(entries) => entries
            .iter()
            .filter_map(|e| match e {
                Value::String(s) => Some(s.clone()),
                Value::Object(o) => o
                    .get("name")
                    .or_else(|| o.get("codename"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => v.to_string(),
    }
}
