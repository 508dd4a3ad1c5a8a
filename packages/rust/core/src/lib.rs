//! Core pipeline for LessonForge.
//!
//! This crate ties markdown segmentation and the content repository together
//! into the two operations the rendering layer consumes: segmenting lesson
//! markdown and resolving embedded exercises.

pub mod pipeline;
pub mod resolver;

pub use pipeline::ContentPipeline;
pub use resolver::resolve_exercise;
