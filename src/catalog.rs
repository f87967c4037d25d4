use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

use crate::recipe::Recipe;

const BUNDLED_RECIPES: &str = include_str!("../data/sample_recipes.json");

/// Read-only pool of candidate recipes the user has not saved.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    recipes: Vec<Recipe>,
}

impl Catalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// The sample recipes compiled into the binary.
    pub fn bundled() -> Result<Self> {
        let recipes: Vec<Recipe> = serde_json::from_str(BUNDLED_RECIPES)
            .context("Failed to parse bundled sample recipes")?;
        Ok(Self::from_loaded(recipes))
    }

    /// Loads a JSON array of recipes. Nameless and duplicate-id entries are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Catalog file not found at: {:?}", path));
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file at {:?}", path))?;
        let recipes: Vec<Recipe> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog file at {:?}", path))?;

        let catalog = Self::from_loaded(recipes);
        if catalog.is_empty() {
            return Err(anyhow::anyhow!("No valid recipes loaded from {:?}", path));
        }
        debug!(count = catalog.len(), ?path, "catalog loaded");
        Ok(catalog)
    }

    fn from_loaded(recipes: Vec<Recipe>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            if recipe.name.trim().is_empty() {
                warn!(id = %recipe.id, "skipping catalog recipe with empty name");
                continue;
            }
            if !seen.insert(recipe.id.clone()) {
                warn!(id = %recipe.id, "skipping catalog recipe with duplicate id");
                continue;
            }
            kept.push(recipe);
        }
        Self { recipes: kept }
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Recipes whose name or any ingredient contains `query`, ignoring case.
    /// A blank query returns the whole catalog.
    pub fn search(&self, query: &str) -> Vec<&Recipe> {
        let q = query.trim().to_lowercase();
        self.recipes
            .iter()
            .filter(|recipe| {
                recipe.name.to_lowercase().contains(&q)
                    || recipe.ingredients.iter().any(|i| i.name.to_lowercase().contains(&q))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
