//! Rating model implementations
//!
//! This module provides the rating model interface and its two
//! implementations, both backed by the skillratings crate: pairwise Elo and
//! Weng-Lin (OpenSkill).

pub mod elo;
pub mod model;
pub mod weng_lin;

// Re-export commonly used types
pub use elo::EloModel;
pub use model::{build_model, RatingModel};
pub use weng_lin::WengLinModel;
