//! Core domain types for LessonForge course content.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::LessonForgeError;

// ---------------------------------------------------------------------------
// ExerciseLocator
// ---------------------------------------------------------------------------

/// The identity of an exercise within the content repository:
/// `(course_slug, module_id, exercise_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExerciseLocator {
    /// Course the exercise belongs to.
    pub course_slug: String,
    /// Module within the course.
    pub module_id: String,
    /// Exercise identifier, as it appears in lesson directives.
    pub exercise_id: String,
}

impl ExerciseLocator {
    pub fn new(
        course_slug: impl Into<String>,
        module_id: impl Into<String>,
        exercise_id: impl Into<String>,
    ) -> Self {
        Self {
            course_slug: course_slug.into(),
            module_id: module_id.into(),
            exercise_id: exercise_id.into(),
        }
    }
}

impl std::fmt::Display for ExerciseLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.course_slug, self.module_id, self.exercise_id
        )
    }
}

impl std::str::FromStr for ExerciseLocator {
    type Err = LessonForgeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [course, module, exercise]
                if !course.is_empty() && !module.is_empty() && !exercise.is_empty() =>
            {
                Ok(Self::new(*course, *module, *exercise))
            }
            _ => Err(LessonForgeError::validation(format!(
                "exercise locator must be course/module/exercise, got '{s}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// DatasetReference
// ---------------------------------------------------------------------------

/// A dataset dependency declared by an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetReference {
    /// Key under which the dataset content is exposed to the caller.
    pub id: String,
    /// Location relative to the shared dataset root.
    pub path: String,
}

// ---------------------------------------------------------------------------
// ExerciseDefinition
// ---------------------------------------------------------------------------

/// One answer option in a quiz exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizChoice {
    /// Display text of the choice.
    pub text: String,
    /// Whether this choice is a correct answer.
    #[serde(default)]
    pub correct: bool,
}

/// An authored unit of practice content, discriminated by its `kind` tag.
///
/// Each variant carries only its own fields; dataset dependencies are shared
/// across kinds, and only SQL exercises may reference a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExerciseDefinition {
    /// A free-form coding exercise with optional starter and solution code.
    Coding {
        title: String,
        /// Instructions shown to the learner, in markdown.
        prompt: String,
        /// Language the learner writes in (e.g. `rust`, `python`).
        language: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        starter_code: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        solution: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        datasets: Vec<DatasetReference>,
    },

    /// A multiple-choice quiz.
    Quiz {
        title: String,
        prompt: String,
        choices: Vec<QuizChoice>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        datasets: Vec<DatasetReference>,
    },

    /// A SQL exercise executed against a shared schema.
    Sql {
        title: String,
        prompt: String,
        /// Schema the learner's query runs against.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expected_query: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        datasets: Vec<DatasetReference>,
    },
}

impl ExerciseDefinition {
    /// Human-readable exercise title.
    pub fn title(&self) -> &str {
        match self {
            Self::Coding { title, .. } | Self::Quiz { title, .. } | Self::Sql { title, .. } => {
                title
            }
        }
    }

    /// The kind tag as it appears in authored YAML.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Coding { .. } => "coding",
            Self::Quiz { .. } => "quiz",
            Self::Sql { .. } => "sql",
        }
    }

    /// Dataset dependencies declared by this exercise, in declaration order.
    pub fn datasets(&self) -> &[DatasetReference] {
        match self {
            Self::Coding { datasets, .. }
            | Self::Quiz { datasets, .. }
            | Self::Sql { datasets, .. } => datasets,
        }
    }

    /// The declared schema id. Only SQL exercises can declare one.
    pub fn schema_id(&self) -> Option<&str> {
        match self {
            Self::Sql { schema_id, .. } => schema_id.as_deref(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ResolvedExercise
// ---------------------------------------------------------------------------

/// An exercise with every declared dependency loaded.
///
/// Built fresh per resolution call; only ever returned fully populated.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedExercise {
    /// The parsed exercise definition.
    pub definition: ExerciseDefinition,
    /// Raw dataset content keyed by the declaring reference's id.
    pub datasets: HashMap<String, String>,
    /// Raw SQL schema text, when the definition declares a schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}
