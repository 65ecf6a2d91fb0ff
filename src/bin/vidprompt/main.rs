//! Command line front end for building and exporting video prompts.
//!
//! Usage:
//!   vidprompt generate --draft draft.json [--format yaml] [--output out.yaml | --out-dir exports/]
//!   vidprompt upload still.png --draft draft.json

mod upload;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidprompt::prompt::presets;
use vidprompt::{Document, Draft, FormStore, OutputFormat, RenderedPrompt, UploadConfig};

#[derive(Parser, Debug)]
#[command(
    name = "vidprompt",
    about = "Build structured video-generation prompts and upload reference media",
    version
)]
struct Args {
    /// Upload configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable the image host with this API key
    #[arg(long, global = true, env = "IMGBB_API_KEY", hide_env_values = true)]
    imgbb_key: Option<String>,

    /// Enable the media host for this cloud name (needs --cloudinary-preset)
    #[arg(long, global = true, env = "CLOUDINARY_CLOUD_NAME")]
    cloudinary_cloud: Option<String>,

    /// Unsigned upload preset for the media host
    #[arg(long, global = true, env = "CLOUDINARY_UPLOAD_PRESET")]
    cloudinary_preset: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the prompt document from a draft and export it
    Generate {
        /// Draft JSON file
        #[arg(short, long)]
        draft: PathBuf,

        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[arg(short, long, conflicts_with = "out_dir")]
        output: Option<PathBuf>,

        /// Write all three formats into this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Re-render an exported JSON or YAML document
    Render {
        /// Document file (.json, .yaml or .yml)
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, value_enum)]
        format: OutputFormat,
    },

    /// Upload a reference image or video
    Upload(upload::UploadArgs),

    /// Print field suggestions for a prompt as JSON
    Suggest { prompt: String },

    /// Expand a one-line prompt into a full draft
    Magic { prompt: String },

    /// List the template catalog
    Templates {
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Apply a template onto a draft (or a fresh one) and print it
    Template {
        id: String,

        /// Draft JSON file, updated in place
        #[arg(short, long)]
        draft: Option<PathBuf>,
    },

    /// Show how complete a draft is
    Progress {
        #[arg(short, long)]
        draft: PathBuf,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidprompt=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    match args.command {
        Command::Generate {
            ref draft,
            format,
            ref output,
            ref out_dir,
        } => generate(draft, format, output.as_deref(), out_dir.as_deref()),
        Command::Render { ref input, format } => render(input, format),
        Command::Upload(ref upload_args) => {
            let config = load_config(&args)?;
            upload::run(upload_args, config).await
        }
        Command::Suggest { ref prompt } => print_json(&presets::suggest(prompt)),
        Command::Magic { ref prompt } => print_json(&presets::magic_prompt(prompt)),
        Command::Templates { ref category } => {
            for t in presets::templates_in(category.as_deref()) {
                println!("{:<12} {:<24} [{}] {}", t.id, t.name, t.category, t.description);
            }
            Ok(())
        }
        Command::Template { ref id, ref draft } => apply_template(id, draft.as_deref()),
        Command::Progress { ref draft } => {
            let store = FormStore::from_draft(load_draft(draft)?);
            let report = store.progress();
            println!("{}% - {}", report.percentage, report.status());
            for entry in &report.entries {
                let mark = if entry.complete { "x" } else { " " };
                println!("  [{}] {}", mark, entry.label);
            }
            Ok(())
        }
    }
}

/// Resolves the upload config from the file and the credential flags.
fn load_config(args: &Args) -> Result<UploadConfig> {
    let mut config = match &args.config {
        Some(path) => UploadConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => UploadConfig::default(),
    };

    if let Some(key) = args.imgbb_key.as_deref().filter(|k| !k.is_empty()) {
        config.enable_image_host(key);
    }
    match (&args.cloudinary_cloud, &args.cloudinary_preset) {
        (Some(cloud), Some(preset)) => config.enable_media_host(cloud.as_str(), preset.as_str()),
        (Some(_), None) | (None, Some(_)) => {
            anyhow::bail!("--cloudinary-cloud and --cloudinary-preset must be given together")
        }
        (None, None) => {}
    }
    Ok(config)
}

pub(crate) fn load_draft(path: &Path) -> Result<Draft> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft {}", path.display()))?;
    Draft::from_json(&json).with_context(|| format!("Failed to parse draft {}", path.display()))
}

pub(crate) fn save_draft(path: &Path, draft: &Draft) -> Result<()> {
    std::fs::write(path, draft.to_json()?)
        .with_context(|| format!("Failed to write draft {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn generate(
    draft: &Path,
    format: OutputFormat,
    output: Option<&Path>,
    out_dir: Option<&Path>,
) -> Result<()> {
    let document = load_draft(draft)?.to_document();

    if let Some(dir) = out_dir {
        std::fs::create_dir_all(dir)?;
        let rendered = RenderedPrompt::from_document(&document)?;
        for format in OutputFormat::ALL {
            let path = dir.join(format.file_name());
            std::fs::write(&path, rendered.get(format))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        return Ok(());
    }

    let rendered = document.render(format)?;
    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            print!("{}", rendered);
            Ok(())
        }
    }
}

fn render(input: &Path, format: OutputFormat) -> Result<()> {
    let source_format = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("json")
        .parse::<OutputFormat>()
        .with_context(|| format!("Unsupported document type: {}", input.display()))?;
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let document = Document::parse(&content, source_format)
        .with_context(|| format!("Failed to parse {}", input.display()))?;
    print!("{}", document.render(format)?);
    Ok(())
}

fn apply_template(id: &str, draft: Option<&Path>) -> Result<()> {
    let template = presets::template(id).with_context(|| {
        let ids: Vec<&str> = presets::TEMPLATES.iter().map(|t| t.id).collect();
        format!("Unknown template '{}'. Available: {}", id, ids.join(", "))
    })?;

    let mut store = match draft {
        Some(path) if path.exists() => FormStore::from_draft(load_draft(path)?),
        _ => FormStore::new(),
    };
    store.apply_patch(&template.patch());

    match draft {
        Some(path) => {
            save_draft(path, store.draft())?;
            eprintln!("Applied template '{}' to {}", template.name, path.display());
            Ok(())
        }
        None => print_json(store.draft()),
    }
}
