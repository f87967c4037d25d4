use std::env;
use std::path::PathBuf;

use crate::entitlement::DEFAULT_ENTITLEMENT_ID;
use crate::mealdb::endpoints::DEFAULT_BASE_URL;

pub const BASE_URL_ENV_VAR: &str = "COOKNOW_MEALDB_BASE_URL";
pub const ENTITLEMENT_ENV_VAR: &str = "COOKNOW_ENTITLEMENT_ID";
pub const PREMIUM_ENV_VAR: &str = "COOKNOW_PREMIUM";
pub const JOURNAL_ENV_VAR: &str = "COOKNOW_JOURNAL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub mealdb_base_url: String,
    pub entitlement_id: String,
    pub premium: bool, // stands in for the subscription provider's customer info
    pub journal_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mealdb_base_url: DEFAULT_BASE_URL.to_string(),
            entitlement_id: DEFAULT_ENTITLEMENT_ID.to_string(),
            premium: false,
            journal_path: None,
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_blank = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            mealdb_base_url: non_blank(BASE_URL_ENV_VAR).unwrap_or(defaults.mealdb_base_url),
            entitlement_id: non_blank(ENTITLEMENT_ENV_VAR).unwrap_or(defaults.entitlement_id),
            premium: non_blank(PREMIUM_ENV_VAR)
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.premium),
            journal_path: non_blank(JOURNAL_ENV_VAR).map(PathBuf::from),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
