//! Matching pantry items against recipe ingredients.
//!
//! A pantry item covers an ingredient when the lower-cased ingredient name contains the
//! lower-cased pantry item, so "tomato" covers "Heirloom tomatoes". The same rule gives
//! false positives ("egg" covers "eggplant"); suggestions accept that trade-off.

use serde::Serialize;
use std::collections::HashSet;

use crate::recipe::Recipe;

/// Lower-cased, trimmed pantry terms with blanks removed.
pub fn normalize_terms<S: AsRef<str>>(pantry: &[S]) -> Vec<String> {
    pantry
        .iter()
        .map(|item| item.as_ref().trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

fn covers(terms: &[String], ingredient_name: &str) -> bool {
    let name = ingredient_name.to_lowercase();
    terms.iter().any(|term| name.contains(term.as_str()))
}

/// True when at least one pantry item is a substring of `ingredient_name`, ignoring case.
pub fn ingredient_matches<S: AsRef<str>>(pantry: &[S], ingredient_name: &str) -> bool {
    covers(&normalize_terms(pantry), ingredient_name)
}

fn distinct_matches(terms: &[String], recipe: &Recipe) -> usize {
    recipe
        .ingredients
        .iter()
        .filter(|i| covers(terms, &i.name))
        .map(|i| i.name.to_lowercase())
        .collect::<HashSet<_>>()
        .len()
}

/// Number of distinct ingredient names in `recipe` covered by the pantry.
pub fn matched_count<S: AsRef<str>>(pantry: &[S], recipe: &Recipe) -> usize {
    distinct_matches(&normalize_terms(pantry), recipe)
}

/// Recipes with at least one covered ingredient, in input order. An empty pantry suggests nothing.
pub fn suggest<'a, S, I>(pantry: &[S], recipes: I) -> Vec<&'a Recipe>
where
    S: AsRef<str>,
    I: IntoIterator<Item = &'a Recipe>,
{
    let terms = normalize_terms(pantry);
    if terms.is_empty() {
        return Vec::new();
    }
    recipes
        .into_iter()
        .filter(|recipe| recipe.ingredients.iter().any(|i| covers(&terms, &i.name)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRecipe<'a> {
    pub recipe: &'a Recipe,
    pub matched: usize,
}

/// Suggested recipes ordered by descending matched count. Ties keep input order.
pub fn rank<'a, S, I>(pantry: &[S], recipes: I) -> Vec<RankedRecipe<'a>>
where
    S: AsRef<str>,
    I: IntoIterator<Item = &'a Recipe>,
{
    let terms = normalize_terms(pantry);
    if terms.is_empty() {
        return Vec::new();
    }
    let mut ranked: Vec<RankedRecipe<'a>> = recipes
        .into_iter()
        .map(|recipe| RankedRecipe {
            recipe,
            matched: distinct_matches(&terms, recipe),
        })
        .filter(|r| r.matched > 0)
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.matched.cmp(&a.matched));
    ranked
}

/// Ingredients whose `has_it` flag is false. Independent of any pantry.
pub fn missing_ingredient_count(recipe: &Recipe) -> usize {
    recipe.missing_count()
}

/// What a pantry is short of for one recipe.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct MatchReport {
    pub recipe_id: String,
    pub recipe_name: String,
    pub missing_ingredients: Vec<String>,
    pub can_make: bool,
}

/// One report per recipe: makeable recipes first, then fewest missing ingredients.
pub fn match_report<'a, S, I>(pantry: &[S], recipes: I) -> Vec<MatchReport>
where
    S: AsRef<str>,
    I: IntoIterator<Item = &'a Recipe>,
{
    let terms = normalize_terms(pantry);
    let mut reports: Vec<MatchReport> = recipes
        .into_iter()
        .map(|recipe| {
            // each name once, first spelling kept
            let mut seen = HashSet::new();
            let missing_ingredients: Vec<String> = recipe
                .ingredients
                .iter()
                .filter(|i| !covers(&terms, &i.name))
                .filter(|i| seen.insert(i.name.to_lowercase()))
                .map(|i| i.name.clone())
                .collect();
            MatchReport {
                recipe_id: recipe.id.clone(),
                recipe_name: recipe.name.clone(),
                can_make: missing_ingredients.is_empty(),
                missing_ingredients,
            }
        })
        .collect();
    reports.sort_by_key(|r| (!r.can_make, r.missing_ingredients.len()));
    reports
}
