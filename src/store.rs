//! The recipe collection store.
//!
//! Holds three disjoint pools: recipes the user saved, the latest remote search results,
//! and the read-only catalog. Lookups resolve in that order (user, remote, catalog).
//! Every mutation goes through [`RecipeStore::apply`] and is appended to an event log,
//! so a store can be rebuilt by replaying its events over the same catalog.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::matcher::{self, MatchReport, RankedRecipe};
use crate::mealdb::{normalize_response, MealDbClient};
use crate::recipe::{Recipe, RecipeInput};

pub const USER_ID_PREFIX: &str = "user-";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StoreEvent {
    Added { recipe: Recipe },
    Toggled { recipe_id: String, ingredient: String },
    RemoteReplaced { recipes: Vec<Recipe> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// A recipe with the same id is already saved; nothing changed.
    AlreadySaved,
    /// A required field was blank; nothing changed.
    Ignored,
}

#[derive(Debug, Default)]
pub struct RecipeStore {
    catalog: Catalog,
    user: Vec<Recipe>,
    remote: Vec<Recipe>,
    events: Vec<StoreEvent>,
}

impl RecipeStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Default::default()
        }
    }

    /// Rebuilds a store by applying `events` in order on top of `catalog`.
    pub fn replay(catalog: Catalog, events: impl IntoIterator<Item = StoreEvent>) -> Self {
        let mut store = Self::new(catalog);
        for event in events {
            store.apply(event);
        }
        info!(
            events = store.events.len(),
            saved = store.user.len(),
            "store rebuilt from event log"
        );
        store
    }

    /// Applies one event and records it. Events that would break an invariant are dropped.
    pub fn apply(&mut self, event: StoreEvent) {
        match &event {
            StoreEvent::Added { recipe } => {
                if self.user.iter().any(|r| r.id == recipe.id) {
                    warn!(id = %recipe.id, "dropping add event for already saved recipe");
                    return;
                }
                self.user.push(recipe.clone());
            }
            StoreEvent::Toggled { recipe_id, ingredient } => {
                let flipped = self
                    .user
                    .iter_mut()
                    .find(|r| &r.id == recipe_id)
                    .map(|r| r.toggle_ingredient(ingredient))
                    .unwrap_or(0);
                if flipped == 0 {
                    return;
                }
            }
            StoreEvent::RemoteReplaced { recipes } => {
                self.remote = recipes.clone();
            }
        }
        self.events.push(event);
    }

    /// Saves a recipe. Drafts get a fresh `user-` id; id-bearing recipes already saved are left alone.
    pub fn add_recipe(&mut self, input: impl Into<RecipeInput>) -> AddOutcome {
        let recipe = match input.into() {
            RecipeInput::Existing(recipe) => {
                if recipe.id.trim().is_empty() || recipe.name.trim().is_empty() {
                    debug!("ignoring recipe with blank id or name");
                    return AddOutcome::Ignored;
                }
                if self.user.iter().any(|r| r.id == recipe.id) {
                    debug!(id = %recipe.id, "recipe already saved");
                    return AddOutcome::AlreadySaved;
                }
                recipe
            }
            RecipeInput::Draft(draft) => {
                if !draft.is_valid() {
                    debug!("ignoring incomplete recipe draft");
                    return AddOutcome::Ignored;
                }
                let id = self.generate_id();
                draft.into_recipe(id)
            }
        };

        info!(id = %recipe.id, name = %recipe.name, source = %recipe.source, "recipe saved");
        self.apply(StoreEvent::Added { recipe });
        AddOutcome::Added
    }

    fn generate_id(&self) -> String {
        let taken: HashSet<&str> = self.all_ids().collect();
        loop {
            let id = format!("{}{}", USER_ID_PREFIX, Uuid::new_v4());
            if !taken.contains(id.as_str()) {
                return id;
            }
        }
    }

    fn all_ids(&self) -> impl Iterator<Item = &str> {
        self.user
            .iter()
            .chain(self.remote.iter())
            .chain(self.catalog.recipes().iter())
            .map(|r| r.id.as_str())
    }

    pub fn get_recipe_by_id(&self, id: &str) -> Option<&Recipe> {
        self.user
            .iter()
            .find(|r| r.id == id)
            .or_else(|| self.remote.iter().find(|r| r.id == id))
            .or_else(|| self.catalog.get(id))
    }

    /// Flips `has_it` on every ingredient of a saved recipe named `ingredient` (ignoring case).
    /// Returns false when the recipe or the ingredient does not exist.
    pub fn toggle_ingredient(&mut self, recipe_id: &str, ingredient: &str) -> bool {
        let before = self.events.len();
        self.apply(StoreEvent::Toggled {
            recipe_id: recipe_id.to_string(),
            ingredient: ingredient.to_string(),
        });
        let toggled = self.events.len() != before;
        if !toggled {
            debug!(recipe_id, ingredient, "toggle matched nothing");
        }
        toggled
    }

    /// Remote results followed by the bundled catalog, without repeated ids.
    fn candidates(&self) -> impl Iterator<Item = &Recipe> {
        let mut seen = HashSet::new();
        self.remote
            .iter()
            .chain(self.catalog.recipes().iter())
            .filter(move |r| seen.insert(r.id.as_str()))
    }

    pub fn suggest_recipes<S: AsRef<str>>(&self, pantry: &[S]) -> Vec<&Recipe> {
        matcher::suggest(pantry, self.candidates())
    }

    pub fn rank_recipes<S: AsRef<str>>(&self, pantry: &[S]) -> Vec<RankedRecipe<'_>> {
        matcher::rank(pantry, self.candidates())
    }

    pub fn match_report<S: AsRef<str>>(&self, pantry: &[S]) -> Vec<MatchReport> {
        matcher::match_report(pantry, self.candidates())
    }

    pub fn missing_ingredient_count(&self, recipe_id: &str) -> Option<usize> {
        self.get_recipe_by_id(recipe_id).map(matcher::missing_ingredient_count)
    }

    pub fn search_catalog(&self, query: &str) -> Vec<&Recipe> {
        self.catalog.search(query)
    }

    /// Searches the remote service and replaces the remote pool with the results.
    /// Failures and empty responses are logged and reported as zero results; the pool is kept.
    pub async fn fetch_from_remote(&mut self, client: &MealDbClient, query: Option<&str>) -> usize {
        let query = query.map(str::trim).unwrap_or_default();
        info!(query, "fetching remote recipes");

        let response = match client.search(query).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "remote recipe fetch failed");
                return 0;
            }
        };

        let recipes = normalize_response(response);
        if recipes.is_empty() {
            info!(query, "remote search returned no recipes");
            return 0;
        }

        let count = recipes.len();
        self.apply(StoreEvent::RemoteReplaced { recipes });
        info!(count, "remote recipes merged");
        count
    }

    /// Saved recipes in the order they were added.
    pub fn recipes(&self) -> &[Recipe] {
        &self.user
    }

    pub fn remote_recipes(&self) -> &[Recipe] {
        &self.remote
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn events(&self) -> &[StoreEvent] {
        &self.events
    }
}
