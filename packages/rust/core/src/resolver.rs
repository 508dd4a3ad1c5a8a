//! Exercise resolution: definition → datasets → schema → hydrated value.

use std::collections::HashMap;

use futures::future;
use tracing::{debug, instrument, warn};

use lessonforge_repository::ContentRepository;
use lessonforge_shared::{ExerciseLocator, LessonForgeError, ResolvedExercise, Result};

/// Resolve one exercise into a fully hydrated value.
///
/// Fetches the definition first, then every declared dataset and, for a SQL
/// exercise that declares one, the schema — all dependency reads run
/// concurrently, since nothing orders them. Any dependency failure aborts
/// the whole resolution; a [`ResolvedExercise`] is only ever returned fully
/// populated. Nothing is cached across calls.
#[instrument(skip(repository), fields(exercise = %locator))]
pub async fn resolve_exercise(
    repository: &ContentRepository,
    locator: &ExerciseLocator,
) -> Result<ResolvedExercise> {
    let definition = repository
        .read_exercise(locator)
        .await
        .map_err(|e| into_resolution(locator, e))?;

    let dataset_fetches = definition.datasets().iter().map(|reference| async move {
        let content = repository.read_dataset(&reference.path).await?;
        Ok::<_, LessonForgeError>((reference.id.clone(), content))
    });

    let schema_fetch = async {
        match definition.schema_id() {
            Some(schema_id) => repository.read_schema(schema_id).await.map(Some),
            None => Ok(None),
        }
    };

    let (fetched, schema) = tokio::try_join!(future::try_join_all(dataset_fetches), schema_fetch)
        .map_err(|e| into_resolution(locator, e))?;

    // `try_join_all` preserves declaration order, so inserting in sequence
    // keeps the last declared occurrence of a duplicated id.
    let mut datasets = HashMap::with_capacity(fetched.len());
    for (id, content) in fetched {
        if datasets.insert(id.clone(), content).is_some() {
            warn!(dataset = %id, exercise = %locator, "duplicate dataset id, last occurrence wins");
        }
    }

    debug!(
        kind = definition.kind_name(),
        datasets = datasets.len(),
        schema = schema.is_some(),
        "exercise resolved"
    );

    Ok(ResolvedExercise {
        definition,
        datasets,
        schema,
    })
}

/// `NotFound`/`Parse` surface to the caller as-is; any other underlying
/// fault is wrapped so the caller sees which resolution it aborted.
fn into_resolution(locator: &ExerciseLocator, err: LessonForgeError) -> LessonForgeError {
    match err {
        e @ (LessonForgeError::NotFound { .. } | LessonForgeError::Parse { .. }) => e,
        other => LessonForgeError::resolution(locator.to_string(), other),
    }
}
