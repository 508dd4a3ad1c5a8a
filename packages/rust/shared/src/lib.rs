//! Shared types, error model, and configuration for LessonForge.
//!
//! This crate is the foundation depended on by all other LessonForge crates.
//! It provides:
//! - [`LessonForgeError`] — the unified error type
//! - Domain types ([`ExerciseDefinition`], [`ExerciseLocator`], [`ResolvedExercise`])
//! - Configuration ([`AppConfig`], [`ContentRoots`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ContentConfig, ContentRoots, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{LessonForgeError, Result};
pub use types::{
    DatasetReference, ExerciseDefinition, ExerciseLocator, QuizChoice, ResolvedExercise,
};
