//! Content and request taxonomy.
//!
//! The catalog is organized as a fixed two-level taxonomy: every piece of
//! content belongs to a [`Category`] and a [`Subcategory`], and each
//! subcategory belongs to exactly one category. Validation enforces the
//! cross-field invariant `subcategory.category() == content.category` on
//! every read and write.

use serde::{Deserialize, Serialize};

/// Top-level content category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Cook,
    Care,
    Diy,
    Family,
}

impl Category {
    /// Accepted wire values, for validation error messages.
    pub const VARIANTS: &'static [&'static str] = &["cook", "care", "diy", "family"];

    /// All categories, in display order.
    pub const ALL: &'static [Self] = &[Self::Cook, Self::Care, Self::Diy, Self::Family];

    /// The subcategories that belong to this category.
    #[must_use]
    pub const fn subcategories(self) -> &'static [Subcategory] {
        match self {
            Self::Cook => &[Subcategory::African, Subcategory::Continental],
            Self::Care => &[
                Subcategory::Bathing,
                Subcategory::Dressing,
                Subcategory::Hairstyling,
            ],
            Self::Diy => &[Subcategory::Decor, Subcategory::Maintenance],
            Self::Family => &[Subcategory::Parents, Subcategory::Kids],
        }
    }

    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cook => "cook",
            Self::Care => "care",
            Self::Diy => "diy",
            Self::Family => "family",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Second-level content category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subcategory {
    African,
    Continental,
    Bathing,
    Dressing,
    Hairstyling,
    Decor,
    Maintenance,
    Parents,
    Kids,
}

impl Subcategory {
    /// Accepted wire values, for validation error messages.
    pub const VARIANTS: &'static [&'static str] = &[
        "african",
        "continental",
        "bathing",
        "dressing",
        "hairstyling",
        "decor",
        "maintenance",
        "parents",
        "kids",
    ];

    /// The category this subcategory belongs to.
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::African | Self::Continental => Category::Cook,
            Self::Bathing | Self::Dressing | Self::Hairstyling => Category::Care,
            Self::Decor | Self::Maintenance => Category::Diy,
            Self::Parents | Self::Kids => Category::Family,
        }
    }

    /// Wire name of the subcategory.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::African => "african",
            Self::Continental => "continental",
            Self::Bathing => "bathing",
            Self::Dressing => "dressing",
            Self::Hairstyling => "hairstyling",
            Self::Decor => "decor",
            Self::Maintenance => "maintenance",
            Self::Parents => "parents",
            Self::Kids => "kids",
        }
    }
}

impl core::fmt::Display for Subcategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation format of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Video,
    Guide,
    Activity,
    Story,
    Checklist,
}

impl ContentType {
    /// Accepted wire values, for validation error messages.
    pub const VARIANTS: &'static [&'static str] =
        &["video", "guide", "activity", "story", "checklist"];
}

/// Service request type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Maid,
    Driver,
    Escort,
    Other,
}

impl RequestType {
    /// Accepted wire values, for validation error messages.
    pub const VARIANTS: &'static [&'static str] = &["maid", "driver", "escort", "other"];

    /// Wire name of the request type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Maid => "maid",
            Self::Driver => "driver",
            Self::Escort => "escort",
            Self::Other => "other",
        }
    }
}

impl core::fmt::Display for RequestType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a service request.
///
/// Requesters only ever create `Pending` rows; every later transition belongs
/// to the operator-side fulfillment workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl RequestStatus {
    /// Accepted wire values, for validation error messages.
    pub const VARIANTS: &'static [&'static str] =
        &["pending", "accepted", "in_progress", "completed", "cancelled"];
}

/// Account status. Accounts are soft-deleted, never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    PendingDeletion,
}

impl UserStatus {
    /// Accepted wire values, for validation error messages.
    pub const VARIANTS: &'static [&'static str] = &["active", "pending_deletion"];
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_subcategory_category_mapping() {
        assert_eq!(Subcategory::African.category(), Category::Cook);
        assert_eq!(Subcategory::Continental.category(), Category::Cook);
        assert_eq!(Subcategory::Bathing.category(), Category::Care);
        assert_eq!(Subcategory::Dressing.category(), Category::Care);
        assert_eq!(Subcategory::Hairstyling.category(), Category::Care);
        assert_eq!(Subcategory::Decor.category(), Category::Diy);
        assert_eq!(Subcategory::Maintenance.category(), Category::Diy);
        assert_eq!(Subcategory::Parents.category(), Category::Family);
        assert_eq!(Subcategory::Kids.category(), Category::Family);
    }

    #[test]
    fn test_every_subcategory_listed_under_its_category() {
        for category in Category::ALL {
            for sub in category.subcategories() {
                assert_eq!(sub.category(), *category);
            }
        }
    }

    #[test]
    fn test_snake_case_wire_format() {
        let json = serde_json::to_string(&RequestStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");

        let parsed: UserStatus = serde_json::from_str("\"pending_deletion\"").unwrap();
        assert_eq!(parsed, UserStatus::PendingDeletion);
    }

    #[test]
    fn test_rejects_unknown_variant() {
        assert!(serde_json::from_str::<Category>("\"bathing\"").is_err());
        assert!(serde_json::from_str::<RequestType>("\"cleaner\"").is_err());
    }
}
