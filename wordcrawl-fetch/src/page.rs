use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Words and outbound links extracted from a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContents {
    #[serde(default)]
    pub word_counts: HashMap<String, usize>,
    #[serde(default)]
    pub links: Vec<String>,
}

impl PageContents {
    pub fn new(word_counts: HashMap<String, usize>, links: Vec<String>) -> Self {
        Self { word_counts, links }
    }

    pub fn with_word(mut self, word: impl Into<String>, count: usize) -> Self {
        *self.word_counts.entry(word.into()).or_insert(0) += count;
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.links.push(link.into());
        self
    }
}
