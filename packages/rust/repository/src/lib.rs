//! Flat-file content repository accessor.
//!
//! [`ContentRepository`] wraps the platform's on-disk content store:
//! exercise definitions under the course root
//! (`<course>/<module>/<exercise>.yaml`), shared datasets under the dataset
//! root, SQL schemas under the schema root. Content is static per
//! deployment, so reads go straight to disk with no invalidation concern.

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::{debug, instrument};

use lessonforge_shared::{
    ContentRoots, ExerciseDefinition, ExerciseLocator, LessonForgeError, Result,
};

/// File extension of exercise definition files.
const EXERCISE_EXT: &str = "yaml";

/// File extension of schema files.
const SCHEMA_EXT: &str = "sql";

/// Read access to the on-disk content repository.
pub struct ContentRepository {
    roots: ContentRoots,
}

impl ContentRepository {
    /// Create a repository over explicit roots.
    pub fn new(roots: ContentRoots) -> Self {
        Self { roots }
    }

    /// Create a repository over a single root directory using the default
    /// `courses`/`datasets`/`schemas` layout.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self::new(ContentRoots::under(root))
    }

    /// On-disk path of an exercise definition file.
    pub fn exercise_path(&self, locator: &ExerciseLocator) -> PathBuf {
        self.roots
            .course_root
            .join(&locator.course_slug)
            .join(&locator.module_id)
            .join(format!("{}.{EXERCISE_EXT}", locator.exercise_id))
    }

    /// Locate and decode an exercise definition.
    ///
    /// An absent file is `NotFound`; a file that exists but does not decode
    /// into an [`ExerciseDefinition`] is `Parse`.
    #[instrument(skip(self), fields(exercise = %locator))]
    pub async fn read_exercise(&self, locator: &ExerciseLocator) -> Result<ExerciseDefinition> {
        validate_id(&locator.course_slug)?;
        validate_id(&locator.module_id)?;
        validate_id(&locator.exercise_id)?;

        let path = self.exercise_path(locator);
        let text = read_text(&path).await?;
        let definition: ExerciseDefinition = serde_yaml::from_str(&text)
            .map_err(|e| LessonForgeError::parse(&path, e.to_string()))?;

        debug!(kind = definition.kind_name(), "exercise definition loaded");
        Ok(definition)
    }

    /// Read a dataset's raw content by its path relative to the dataset root.
    #[instrument(skip(self))]
    pub async fn read_dataset(&self, relative_path: &str) -> Result<String> {
        validate_relative(relative_path)?;
        read_text(&self.roots.dataset_root.join(relative_path)).await
    }

    /// Read a schema's raw SQL text by its id.
    #[instrument(skip(self))]
    pub async fn read_schema(&self, schema_id: &str) -> Result<String> {
        validate_id(schema_id)?;
        let path = self.roots.schema_root.join(format!("{schema_id}.{SCHEMA_EXT}"));
        read_text(&path).await
    }
}

/// Read a UTF-8 file, mapping an absent file to `NotFound`.
async fn read_text(path: &Path) -> Result<String> {
    match fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(LessonForgeError::not_found(path))
        }
        Err(e) => Err(LessonForgeError::io(path, e)),
    }
}

/// Identifiers are a single path segment: `[A-Za-z0-9_-]+`.
fn validate_id(id: &str) -> Result<()> {
    let well_formed = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if well_formed {
        Ok(())
    } else {
        Err(LessonForgeError::validation(format!(
            "invalid content identifier '{id}'"
        )))
    }
}

/// Dataset paths must stay under the dataset root.
fn validate_relative(path: &str) -> Result<()> {
    let candidate = Path::new(path);
    let escapes = candidate.is_absolute()
        || candidate
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));

    if path.is_empty() || escapes {
        return Err(LessonForgeError::validation(format!(
            "invalid dataset path '{path}'"
        )));
    }
    Ok(())
}
