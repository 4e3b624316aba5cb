//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Document ids in the
//! backing store are strings, so these wrap `String` rather than an integer.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - A `random()` constructor backed by UUID v4
///
/// # Example
///
/// ```rust
/// # use homehaven_core::define_id;
/// define_id!(UserId);
/// define_id!(ContentId);
///
/// let user_id = UserId::new("user-1");
/// let content_id = ContentId::new("content-1");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = content_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from anything string-like.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh random ID (UUID v4).
            #[must_use]
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4().to_string())
            }

            /// View the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(ContentId);
define_id!(SavedContentId);
define_id!(ProgressId);
define_id!(RequestId);
define_id!(ErasureId);
define_id!(ConsentId);

impl SavedContentId {
    /// Deterministic id for a `(user, content)` pair.
    ///
    /// Deriving the id from the pair enforces "at most one saved record per
    /// pair" without a secondary uniqueness index.
    #[must_use]
    pub fn for_pair(user_id: &UserId, content_id: &ContentId) -> Self {
        Self(format!("{}_{}", user_id.as_str(), content_id.as_str()))
    }
}

impl ProgressId {
    /// Deterministic id for a `(user, content)` pair.
    #[must_use]
    pub fn for_pair(user_id: &UserId, content_id: &ContentId) -> Self {
        Self(format!("{}_{}", user_id.as_str(), content_id.as_str()))
    }
}
