use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub const DEFAULT_ENTITLEMENT_ID: &str = "premium";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntitlementError {
    #[error("{feature} requires an active '{entitlement}' subscription")]
    PremiumRequired { feature: String, entitlement: String },
}

/// The subscription provider's view of the user: which entitlements are active.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct CustomerInfo {
    #[serde(default)]
    pub active_entitlements: HashSet<String>,
}

impl CustomerInfo {
    pub fn with_entitlement(id: impl Into<String>) -> Self {
        Self {
            active_entitlements: HashSet::from([id.into()]),
        }
    }
}

/// Gates premium features on one named entitlement.
#[derive(Debug, Clone)]
pub struct PremiumGate {
    entitlement_id: String,
    premium: bool,
}

impl PremiumGate {
    pub fn new(entitlement_id: impl Into<String>, info: &CustomerInfo) -> Self {
        let entitlement_id = entitlement_id.into();
        let premium = info.active_entitlements.contains(&entitlement_id);
        Self {
            entitlement_id,
            premium,
        }
    }

    pub fn is_premium(&self) -> bool {
        self.premium
    }

    pub fn require(&self, feature: &str) -> Result<(), EntitlementError> {
        if self.premium {
            Ok(())
        } else {
            Err(EntitlementError::PremiumRequired {
                feature: feature.to_string(),
                entitlement: self.entitlement_id.clone(),
            })
        }
    }
}
