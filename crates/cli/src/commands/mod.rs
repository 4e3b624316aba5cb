//! Command implementations.

pub mod erase;
pub mod seed;
pub mod show;
