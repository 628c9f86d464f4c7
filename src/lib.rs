//! League Ratings - team skill rankings from match history
//!
//! This crate replays recorded match results per league through pluggable
//! rating algorithms (Elo and Weng-Lin/OpenSkill) and answers ordered
//! standings queries over the resulting rating state.

pub mod config;
pub mod engine;
pub mod error;
pub mod rating;
pub mod standings;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use engine::RatingEngine;
pub use rating::{build_model, RatingModel};
pub use store::{InMemoryMatchStore, MatchStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
