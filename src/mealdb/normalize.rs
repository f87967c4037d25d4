use tracing::warn;

use super::endpoints::{Meal, MealSearchResponse, INGREDIENT_SLOTS};
use crate::recipe::{Ingredient, Recipe, RecipeSource};

pub const REMOTE_ID_PREFIX: &str = "api-";

fn non_blank(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Splits free text into lines and renumbers them as "1. ...", "2. ...".
pub fn number_instructions(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| format!("{}. {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts one meal into a recipe. Meals without a name are dropped.
pub fn normalize_meal(meal: &Meal) -> Option<Recipe> {
    let name = match non_blank(meal.name.as_ref()) {
        Some(name) => name,
        None => {
            warn!(id = %meal.id, "remote meal has no name, skipping");
            return None;
        }
    };

    let ingredients = (1..=INGREDIENT_SLOTS)
        .filter_map(|slot| meal.ingredient_slot(slot))
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(Ingredient::new)
        .collect();

    Some(Recipe {
        id: format!("{}{}", REMOTE_ID_PREFIX, meal.id),
        name,
        ingredients,
        instructions: number_instructions(meal.instructions.as_deref().unwrap_or_default()),
        link: non_blank(meal.source_url.as_ref()).or_else(|| non_blank(meal.youtube_url.as_ref())),
        image: non_blank(meal.thumbnail.as_ref()),
        source: RecipeSource::Api,
    })
}

pub fn normalize_response(response: MealSearchResponse) -> Vec<Recipe> {
    response
        .meals
        .unwrap_or_default()
        .iter()
        .filter_map(normalize_meal)
        .collect()
}
