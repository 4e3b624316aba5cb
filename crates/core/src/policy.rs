//! Policy gate: age categorization and jurisdiction-based feature
//! enablement.
//!
//! Pure functions over an explicit [`PolicyContext`] — no storage access.
//! The facade consults the gate before accepting request submissions and
//! consent flows.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::taxonomy::RequestType;

/// Age bucket used by the consent rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeCategory {
    Under13,
    Teen,
    Adult,
    Unknown,
}

impl AgeCategory {
    /// Categorize a reported age by fixed thresholds.
    ///
    /// Negative or non-finite input is `Unknown` — never coerced to a
    /// bucket.
    #[must_use]
    pub fn from_age(age: f64) -> Self {
        if !age.is_finite() || age < 0.0 {
            Self::Unknown
        } else if age < 13.0 {
            Self::Under13
        } else if age < 18.0 {
            Self::Teen
        } else {
            Self::Adult
        }
    }
}

/// Jurisdiction-driven policy configuration, fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyContext {
    /// Jurisdiction the deployment operates in (e.g. `"NG"`, `"EU"`).
    pub jurisdiction: String,
    /// Human-readable name of the policy behind any restrictions.
    pub store_policy: String,
    /// Request types disabled in this jurisdiction.
    pub disabled_request_types: HashSet<RequestType>,
    /// Jurisdictions where under-13 users need parental consent.
    pub parental_consent_required_regions: HashSet<String>,
}

impl Default for PolicyContext {
    fn default() -> Self {
        Self {
            jurisdiction: "NG".to_owned(),
            store_policy: "local service regulations".to_owned(),
            disabled_request_types: HashSet::new(),
            parental_consent_required_regions: HashSet::new(),
        }
    }
}

impl PolicyContext {
    /// Whether a request type may be submitted under this policy.
    #[must_use]
    pub fn is_request_type_allowed(&self, request_type: RequestType) -> bool {
        !self.disabled_request_types.contains(&request_type)
    }

    /// Whether the given age bucket needs parental consent here.
    #[must_use]
    pub fn requires_parental_consent(&self, age_category: AgeCategory) -> bool {
        age_category == AgeCategory::Under13
            && self
                .parental_consent_required_regions
                .contains(&self.jurisdiction)
    }

    /// A human-readable notice when any request types are disabled.
    #[must_use]
    pub fn restriction_notice(&self) -> Option<String> {
        if self.disabled_request_types.is_empty() {
            return None;
        }
        Some(format!(
            "Some request types are unavailable in {} due to {}.",
            self.jurisdiction, self.store_policy
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restricted() -> PolicyContext {
        PolicyContext {
            jurisdiction: "NG".to_owned(),
            store_policy: "escort licensing rules".to_owned(),
            disabled_request_types: HashSet::from([RequestType::Escort]),
            parental_consent_required_regions: HashSet::from(["NG".to_owned()]),
        }
    }

    #[test]
    fn test_age_thresholds() {
        assert_eq!(AgeCategory::from_age(0.0), AgeCategory::Under13);
        assert_eq!(AgeCategory::from_age(12.9), AgeCategory::Under13);
        assert_eq!(AgeCategory::from_age(13.0), AgeCategory::Teen);
        assert_eq!(AgeCategory::from_age(17.9), AgeCategory::Teen);
        assert_eq!(AgeCategory::from_age(18.0), AgeCategory::Adult);
        assert_eq!(AgeCategory::from_age(-1.0), AgeCategory::Unknown);
        assert_eq!(AgeCategory::from_age(f64::NAN), AgeCategory::Unknown);
        assert_eq!(AgeCategory::from_age(f64::INFINITY), AgeCategory::Unknown);
    }

    #[test]
    fn test_request_type_gate() {
        let ctx = restricted();
        assert!(!ctx.is_request_type_allowed(RequestType::Escort));
        assert!(ctx.is_request_type_allowed(RequestType::Maid));
    }

    #[test]
    fn test_parental_consent_needs_both_conditions() {
        let ctx = restricted();
        assert!(ctx.requires_parental_consent(AgeCategory::Under13));
        assert!(!ctx.requires_parental_consent(AgeCategory::Teen));

        let elsewhere = PolicyContext {
            jurisdiction: "SE".to_owned(),
            ..restricted()
        };
        assert!(!elsewhere.requires_parental_consent(AgeCategory::Under13));
    }

    #[test]
    fn test_restriction_notice() {
        assert!(PolicyContext::default().restriction_notice().is_none());

        let notice = restricted().restriction_notice().unwrap_or_default();
        assert!(notice.contains("NG"));
        assert!(notice.contains("escort licensing rules"));
    }
}
