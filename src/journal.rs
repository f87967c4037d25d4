use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::store::StoreEvent;

/// Append-only JSON-lines file of store events.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All recorded events, oldest first. A journal that does not exist yet is empty.
    pub fn read_events(&self) -> Result<Vec<StoreEvent>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read journal at {:?}", self.path))?;

        let mut events = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let event: StoreEvent = serde_json::from_str(line)
                .with_context(|| format!("Invalid journal entry at {:?} line {}", self.path, line_no + 1))?;
            events.push(event);
        }
        debug!(count = events.len(), path = ?self.path, "journal read");
        Ok(events)
    }

    pub fn append(&self, events: &[StoreEvent]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open journal at {:?}", self.path))?;
        let mut writer = BufWriter::new(file);
        for event in events {
            serde_json::to_writer(&mut writer, event)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        debug!(count = events.len(), path = ?self.path, "journal appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{Ingredient, Recipe, RecipeSource};
    use tempfile::tempdir;

    fn added(id: &str) -> StoreEvent {
        StoreEvent::Added {
            recipe: Recipe {
                id: id.to_string(),
                name: "Toast".to_string(),
                ingredients: vec![Ingredient::new("Bread")],
                instructions: "Toast it".to_string(),
                link: None,
                image: None,
                source: RecipeSource::User,
            },
        }
    }

    #[test]
    fn test_missing_journal_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let journal = Journal::new(dir.path().join("events.jsonl"));
        assert!(journal.read_events()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_append_accumulates() -> Result<()> {
        let dir = tempdir()?;
        let journal = Journal::new(dir.path().join("events.jsonl"));
        journal.append(&[added("user-1")])?;
        journal.append(&[StoreEvent::Toggled {
            recipe_id: "user-1".to_string(),
            ingredient: "Bread".to_string(),
        }])?;

        let events = journal.read_events()?;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], added("user-1"));
        assert!(matches!(&events[1], StoreEvent::Toggled { ingredient, .. } if ingredient == "Bread"));
        Ok(())
    }

    #[test]
    fn test_corrupt_line_reports_position() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("events.jsonl");
        fs::write(&path, "\n{not json}\n")?;
        let err = Journal::new(&path).read_events().unwrap_err();
        assert!(err.to_string().contains("line 2"));
        Ok(())
    }
}
