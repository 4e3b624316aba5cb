//! Homehaven Core - Offline-first data repository.
//!
//! This crate is the data layer shared by all Homehaven surfaces:
//! - `web` - HTTP API over the facade
//! - `cli` - Command-line tools for seeding and inspection
//!
//! # Architecture
//!
//! Every read and write flows through [`facade::DataFacade`], which composes
//! the keyed collection store, the entity repositories, the join resolver,
//! and the policy gate, and enforces identity-ownership checks before any
//! per-user operation. Storage is swappable behind
//! [`store::CollectionStore`]; identity is swappable behind
//! [`identity::IdentityProvider`].
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe document ids
//! - [`taxonomy`] - Closed category, content-type, and request-type vocabularies
//! - [`model`] - Entity structs and their field-level validators
//! - [`store`] - Keyed collection store (memory and JSON-file backends)
//! - [`repo`] - Per-collection repositories
//! - [`resolver`] - Continue-watching and saved-content joins
//! - [`tracking`] - Progress flush controller
//! - [`policy`] - Age categorization and jurisdiction gates
//! - [`identity`] - Current-user abstraction and the demo provider
//! - [`facade`] - The single entry point surfaces call
//! - [`error`] - Error taxonomy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod facade;
pub mod identity;
pub mod model;
pub mod policy;
pub mod repo;
pub mod resolver;
pub mod store;
pub mod taxonomy;
pub mod tracking;
pub mod types;

pub use error::{DataError, Result};
pub use facade::DataFacade;
