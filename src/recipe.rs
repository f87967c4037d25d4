use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecipeSource {
    Mock,
    Api,
    User,
}

impl fmt::Display for RecipeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeSource::Mock => write!(f, "mock"),
            RecipeSource::Api => write!(f, "api"),
            RecipeSource::User => write!(f, "user"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub has_it: bool, // "owned by user"
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_it: false,
        }
    }

    pub fn owned(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_it: true,
        }
    }

    /// Identity comparison used by toggling: exact name after case-folding.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub ingredients: Vec<Ingredient>, // display order, never reordered
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub source: RecipeSource,
}

impl Recipe {
    pub fn missing_ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.iter().filter(|i| !i.has_it)
    }

    /// Count of ingredients the user does not have yet.
    pub fn missing_count(&self) -> usize {
        self.missing_ingredients().count()
    }

    /// Flips `has_it` on every ingredient carrying `name`. Returns how many entries flipped.
    pub fn toggle_ingredient(&mut self, name: &str) -> usize {
        let mut flipped = 0;
        for ingredient in self.ingredients.iter_mut().filter(|i| i.is_named(name)) {
            ingredient.has_it = !ingredient.has_it;
            flipped += 1;
        }
        flipped
    }
}

/// A recipe as typed into the add-recipe form, before the store assigns it an id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl RecipeDraft {
    /// Builds a draft from raw form fields. Returns `None` when a required field is blank,
    /// which callers treat as "do nothing".
    pub fn from_form(name: &str, ingredients_text: &str, instructions: &str, link: Option<&str>) -> Option<Self> {
        if name.trim().is_empty() || ingredients_text.trim().is_empty() || instructions.trim().is_empty() {
            return None;
        }

        Some(Self {
            name: name.trim().to_string(),
            ingredients: parse_ingredient_lines(ingredients_text),
            instructions: instructions.trim().to_string(),
            link: link.map(str::trim).filter(|l| !l.is_empty()).map(str::to_string),
        })
    }

    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.ingredients.is_empty() && !self.instructions.trim().is_empty()
    }

    /// Every ingredient of a new user recipe starts out not owned.
    pub fn into_recipe(self, id: String) -> Recipe {
        Recipe {
            id,
            name: self.name,
            ingredients: self.ingredients.into_iter().map(|i| Ingredient::new(i.name)).collect(),
            instructions: self.instructions,
            link: self.link,
            image: None,
            source: RecipeSource::User,
        }
    }
}

/// Either a recipe that already carries an id (saved from browsing) or a fresh draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeInput {
    Existing(Recipe),
    Draft(RecipeDraft),
}

impl From<Recipe> for RecipeInput {
    fn from(recipe: Recipe) -> Self {
        RecipeInput::Existing(recipe)
    }
}

impl From<RecipeDraft> for RecipeInput {
    fn from(draft: RecipeDraft) -> Self {
        RecipeInput::Draft(draft)
    }
}

/// One ingredient per line; lines are trimmed and blanks dropped.
pub fn parse_ingredient_lines(text: &str) -> Vec<Ingredient> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Ingredient::new)
        .collect()
}
