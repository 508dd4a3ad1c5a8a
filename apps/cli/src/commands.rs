//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use lessonforge_core::ContentPipeline;
use lessonforge_markdown::{ContentSegment, EmbedKind};
use lessonforge_repository::ContentRepository;
use lessonforge_shared::{
    ContentRoots, ExerciseLocator, config_file_path, init_config, load_config,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// LessonForge — lesson content tooling.
#[derive(Parser)]
#[command(
    name = "lessonforge",
    version,
    about = "Parse lesson markdown and resolve embedded exercises from the content repository.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Segment a lesson markdown file into prose and embed segments.
    Parse {
        /// Lesson markdown file.
        file: PathBuf,

        /// Emit the full document model as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Resolve one exercise into its fully hydrated form.
    Resolve {
        /// Exercise locator, as course/module/exercise.
        exercise: String,

        /// Content repository root (overrides the config file).
        #[arg(long)]
        root: Option<PathBuf>,

        /// Emit the resolved exercise as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Verify that every exercise embedded in the given lessons resolves.
    Check {
        /// Course the lesson files belong to.
        #[arg(long)]
        course: String,

        /// Module the lesson files belong to.
        #[arg(long)]
        module: String,

        /// Content repository root (overrides the config file).
        #[arg(long)]
        root: Option<PathBuf>,

        /// Lesson markdown files.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "lessonforge=info",
        1 => "lessonforge=debug",
        _ => "lessonforge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Parse { file, json } => cmd_parse(&file, json),
        Command::Resolve {
            exercise,
            root,
            json,
        } => cmd_resolve(&exercise, root.as_deref(), json).await,
        Command::Check {
            course,
            module,
            root,
            files,
        } => cmd_check(&course, &module, root.as_deref(), &files).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Open the content repository from a CLI root override or the config file.
fn open_repository(root: Option<&Path>) -> Result<ContentRepository> {
    match root {
        Some(root) => Ok(ContentRepository::from_root(root)),
        None => {
            let config = load_config()?;
            Ok(ContentRepository::new(ContentRoots::from(&config)))
        }
    }
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

fn cmd_parse(file: &Path, json: bool) -> Result<()> {
    let markdown = std::fs::read_to_string(file)
        .map_err(|e| eyre!("cannot read lesson file '{}': {e}", file.display()))?;

    info!(file = %file.display(), "segmenting lesson markdown");
    let doc = lessonforge_markdown::segment(&markdown);

    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!();
    println!("  File:     {}", file.display());
    println!("  Segments: {}", doc.segments.len());
    println!("  Embeds:   {}", doc.embeds.len());
    println!();
    for (i, segment) in doc.segments.iter().enumerate() {
        match segment {
            ContentSegment::Prose { text } => {
                println!("  {:>3}. prose  {}", i + 1, preview(text));
            }
            ContentSegment::Embed { reference, .. } => {
                println!("  {:>3}. embed  {}:{}", i + 1, reference.kind, reference.id);
            }
        }
    }
    println!();

    Ok(())
}

/// First line's worth of a prose segment, for the summary listing.
fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 48;

    let flat = text.replace('\n', " ");
    if flat.chars().count() <= MAX_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(MAX_CHARS).collect();
        format!("{cut}…")
    }
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

async fn cmd_resolve(exercise: &str, root: Option<&Path>, json: bool) -> Result<()> {
    let locator: ExerciseLocator = exercise.parse()?;
    let pipeline = ContentPipeline::new(open_repository(root)?);

    info!(exercise = %locator, "resolving exercise");
    let resolved = pipeline.resolve(&locator).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    let mut dataset_ids: Vec<&String> = resolved.datasets.keys().collect();
    dataset_ids.sort();
    let datasets = if dataset_ids.is_empty() {
        "none".to_string()
    } else {
        dataset_ids
            .iter()
            .map(|id| format!("{id} ({} B)", resolved.datasets[*id].len()))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let schema = match (&resolved.schema, resolved.definition.schema_id()) {
        (Some(text), Some(id)) => format!("{id} ({} B)", text.len()),
        _ => "none".to_string(),
    };

    println!();
    println!("  Exercise: {locator}");
    println!("  Kind:     {}", resolved.definition.kind_name());
    println!("  Title:    {}", resolved.definition.title());
    println!("  Datasets: {datasets}");
    println!("  Schema:   {schema}");
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

async fn cmd_check(
    course: &str,
    module: &str,
    root: Option<&Path>,
    files: &[PathBuf],
) -> Result<()> {
    let pipeline = ContentPipeline::new(open_repository(root)?);

    // Segment everything up front so the progress bar knows its length.
    let mut work: Vec<(PathBuf, String)> = Vec::new();
    let mut external = 0usize;

    for file in files {
        let markdown = std::fs::read_to_string(file)
            .map_err(|e| eyre!("cannot read lesson file '{}': {e}", file.display()))?;

        for embed in pipeline.segment(&markdown).embeds {
            match embed.kind {
                EmbedKind::Exercise => work.push((file.clone(), embed.id)),
                // Dataset and colab embeds are the rendering layer's business.
                EmbedKind::Dataset | EmbedKind::Colab => external += 1,
            }
        }
    }

    info!(
        course,
        module,
        files = files.len(),
        exercises = work.len(),
        "checking lesson embeds"
    );

    let bar = ProgressBar::new(work.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:32.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );

    let mut failures: Vec<(PathBuf, String, String)> = Vec::new();

    for (file, exercise_id) in &work {
        bar.set_message(exercise_id.clone());
        let locator = ExerciseLocator::new(course, module, exercise_id.clone());
        if let Err(e) = pipeline.resolve(&locator).await {
            failures.push((file.clone(), exercise_id.clone(), e.to_string()));
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    println!();
    println!(
        "  Checked {} file(s): {} exercise reference(s), {} external embed(s) skipped",
        files.len(),
        work.len(),
        external
    );

    if failures.is_empty() {
        println!("  All exercise references resolve.");
        println!();
        return Ok(());
    }

    println!();
    for (file, exercise_id, message) in &failures {
        println!("  {}  {exercise_id}: {message}", file.display());
    }
    println!();

    Err(eyre!(
        "{} of {} exercise reference(s) failed to resolve",
        failures.len(),
        work.len()
    ))
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Created {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let path = config_file_path()?;
    let config = load_config()?;
    let rendered = toml::to_string_pretty(&config)?;

    println!();
    if path.exists() {
        println!("  Config file: {}", path.display());
    } else {
        println!("  Config file: {} (not created yet, showing defaults)", path.display());
    }
    println!();
    print!("{rendered}");

    Ok(())
}
