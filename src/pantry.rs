use serde::{Deserialize, Serialize};

/// Ingredients the user currently has on hand. Entries are trimmed, never blank,
/// and unique ignoring case; the first spelling entered is the one kept.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Pantry {
    items: Vec<String>,
}

impl Pantry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the item was blank or already present.
    pub fn add(&mut self, item: &str) -> bool {
        let trimmed = item.trim();
        if trimmed.is_empty() || self.contains(trimmed) {
            return false;
        }
        self.items.push(trimmed.to_string());
        true
    }

    pub fn remove(&mut self, item: &str) -> bool {
        let key = item.trim().to_lowercase();
        let before = self.items.len();
        self.items.retain(|existing| existing.to_lowercase() != key);
        self.items.len() != before
    }

    pub fn contains(&self, item: &str) -> bool {
        let key = item.trim().to_lowercase();
        self.items.iter().any(|existing| existing.to_lowercase() == key)
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Pantry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut pantry = Pantry::new();
        for item in iter {
            pantry.add(item.as_ref());
        }
        pantry
    }
}
