use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::recipe::Recipe;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GroceryGroup {
    pub recipe_name: String,
    pub items: Vec<String>,
}

/// Shopping items grouped by the recipe that needs them.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct GroceryList {
    groups: Vec<GroceryGroup>,
}

#[derive(Debug, Serialize)]
struct GroceryRow<'a> {
    recipe: &'a str,
    item: &'a str,
}

impl GroceryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// One group per recipe with at least one ingredient the user does not have.
    pub fn from_recipes<'a>(recipes: impl IntoIterator<Item = &'a Recipe>) -> Self {
        let mut list = Self::new();
        for recipe in recipes {
            let missing: Vec<String> = recipe.missing_ingredients().map(|i| i.name.clone()).collect();
            list.add_missing_items(&recipe.name, missing);
        }
        list
    }

    /// Creates the recipe's group or merges `items` into it, skipping items already listed.
    pub fn add_missing_items(&mut self, recipe_name: &str, items: Vec<String>) {
        if items.is_empty() {
            return;
        }
        let group = match self.groups.iter().position(|g| g.recipe_name == recipe_name) {
            Some(idx) => &mut self.groups[idx],
            None => {
                self.groups.push(GroceryGroup {
                    recipe_name: recipe_name.to_string(),
                    items: Vec::new(),
                });
                let last = self.groups.len() - 1;
                &mut self.groups[last]
            }
        };
        for item in items {
            if !group.items.contains(&item) {
                group.items.push(item);
            }
        }
    }

    /// Checks an item off: removes it, and drops the group once it is empty.
    pub fn toggle_item(&mut self, recipe_name: &str, item: &str) {
        for group in self.groups.iter_mut().filter(|g| g.recipe_name == recipe_name) {
            group.items.retain(|i| i != item);
        }
        self.groups.retain(|g| !g.items.is_empty());
    }

    pub fn groups(&self) -> &[GroceryGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for group in &self.groups {
            for item in &group.items {
                wtr.serialize(GroceryRow {
                    recipe: &group.recipe_name,
                    item,
                })?;
            }
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create grocery list file at {:?}", path))?;
        self.write_csv(file)
            .with_context(|| format!("Failed to write grocery list to {:?}", path))
    }
}
