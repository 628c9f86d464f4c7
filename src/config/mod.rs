//! Configuration management for the rating engine
//!
//! This module handles configuration loading from environment variables or
//! TOML files, validation, and default values for the engine and its rating
//! models.

pub mod engine;
pub mod rating;

// Re-export commonly used types
pub use engine::{
    validate_config, EngineConfig, RankingSettings, ReplaySettings, RetroactivePolicy, TieBreak,
};
pub use rating::{EloSettings, RatingConfig, WengLinSettings};
