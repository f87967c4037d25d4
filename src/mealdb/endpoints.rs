use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";
pub const SEARCH_PATH: &str = "search.php";

/// The service encodes ingredients as numbered fields `strIngredient1` ..= `strIngredient20`.
pub const INGREDIENT_SLOTS: usize = 20;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct MealSearchResponse {
    #[serde(default)]
    pub meals: Option<Vec<Meal>>, // null when nothing matched
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Meal {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal", default)]
    pub name: Option<String>,
    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,
    #[serde(rename = "strSource", default)]
    pub source_url: Option<String>,
    #[serde(rename = "strYoutube", default)]
    pub youtube_url: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
    #[serde(flatten)]
    pub fields: HashMap<String, serde_json::Value>,
}

impl Meal {
    /// Raw value of `strIngredient{slot}`, if present and a string.
    pub fn ingredient_slot(&self, slot: usize) -> Option<&str> {
        self.fields
            .get(&format!("strIngredient{}", slot))
            .and_then(serde_json::Value::as_str)
    }

    pub fn measure_slot(&self, slot: usize) -> Option<&str> {
        self.fields
            .get(&format!("strMeasure{}", slot))
            .and_then(serde_json::Value::as_str)
    }
}
