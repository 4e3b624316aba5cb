//! Entity repositories.
//!
//! One repository per entity type, each owning validation, identity
//! derivation, and query operations over a single collection. Repositories
//! borrow the store (they are cheap, short-lived views) and build everything
//! from the [`CollectionStore`](crate::store::CollectionStore) contract —
//! mutations go through `update` so the read-modify-write is atomic.

pub mod content;
pub mod progress;
pub mod request;
pub mod saved;
pub mod user;

pub use content::{ContentFilter, ContentRepository};
pub use progress::{ContentProgressRepository, ProgressWrite};
pub use request::{RequestUpdateOutcome, ServiceRequestRepository};
pub use saved::SavedContentRepository;
pub use user::{ConsentRepository, ErasureRepository, ProfileUpdate, UserRepository};
