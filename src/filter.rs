use serde::Deserialize;
use tracing::debug;

use crate::sanitize::{strip_tags, text_length};
use crate::types::ContentItem;

/// Keep items whose stripped `element` text is at most `max_chars` characters.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterCriterion {
    pub element: String,
    pub max_chars: usize,
}

impl Default for FilterCriterion {
    fn default() -> Self {
        Self { element: "basemodeloverview".to_string(), max_chars: 250 }
    }
}

impl FilterCriterion {
    /// Plain-text length of the filter element. A missing element counts as empty.
    pub fn measure(&self, item: &ContentItem) -> usize {
        match item.raw_element(&self.element) {
            Some(raw) => text_length(&strip_tags(&raw)),
            None => {
                debug!(item = %item.system.codename, element = %self.element, "filter element missing, treating as empty");
                0
            }
        }
    }

    pub fn accepts(&self, item: &ContentItem) -> bool {
        self.measure(item) <= self.max_chars
    }

    /// Retained items, in input order.
    pub fn apply(&self, items: Vec<ContentItem>) -> Vec<ContentItem> {
        items.into_iter().filter(|i| self.accepts(i)).collect()
    }
}
