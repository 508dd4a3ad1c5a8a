//! The two entry points consumed by the rendering layer.

use lessonforge_markdown::ParsedDocument;
use lessonforge_repository::ContentRepository;
use lessonforge_shared::{ExerciseLocator, ResolvedExercise, Result};

use crate::resolver;

/// Facade over markdown segmentation and exercise resolution.
///
/// The rendering layer hands raw lesson markdown to [`segment`] and exercise
/// locators (extracted from `exercise` embeds) to [`resolve`]. `dataset` and
/// `colab` embeds are surfaced in the document model but interpreting them
/// is the caller's business.
///
/// [`segment`]: ContentPipeline::segment
/// [`resolve`]: ContentPipeline::resolve
pub struct ContentPipeline {
    repository: ContentRepository,
}

impl ContentPipeline {
    /// Create a pipeline over the given content repository.
    pub fn new(repository: ContentRepository) -> Self {
        Self { repository }
    }

    /// Parse raw lesson markdown into the ordered document model.
    pub fn segment(&self, markdown: &str) -> ParsedDocument {
        lessonforge_markdown::segment(markdown)
    }

    /// Resolve one exercise reference into its fully hydrated form.
    pub async fn resolve(&self, locator: &ExerciseLocator) -> Result<ResolvedExercise> {
        resolver::resolve_exercise(&self.repository, locator).await
    }
}
