//! `vidprompt upload`: validate, upload with a progress bar, and optionally
//! record the result in a draft.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use vidprompt::upload::validate::check_size;
use vidprompt::upload::ProgressCallback;
use vidprompt::{FormStore, MediaKind, UploadConfig, UploadFile, UploadProgress, Uploader};

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// File to upload
    file: PathBuf,

    /// Treat the file as a reference video (default: image)
    #[arg(long)]
    video: bool,

    /// MIME type (inferred from the extension if omitted)
    #[arg(long)]
    mime: Option<String>,

    /// Draft JSON file to append the uploaded reference to
    #[arg(short, long)]
    draft: Option<PathBuf>,
}

pub async fn run(args: &UploadArgs, config: UploadConfig) -> Result<()> {
    let kind = if args.video {
        MediaKind::Video
    } else {
        MediaKind::Image
    };

    let mime = match &args.mime {
        Some(mime) => mime.clone(),
        None => args
            .file
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| config.mime_for_extension(e))
            .with_context(|| {
                format!("Cannot infer MIME type of {}; pass --mime", args.file.display())
            })?,
    };

    let size = std::fs::metadata(&args.file)
        .with_context(|| format!("Failed to stat {}", args.file.display()))?
        .len();
    check_size(&config.limits, size, kind)?;

    let file = UploadFile::read(&args.file, mime)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let uploader = Uploader::new(config).context("Failed to create HTTP client")?;
    uploader.validate_file(&file, kind)?;

    let pb = ProgressBar::new(file.size());
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}")?
            .progress_chars("=>-"),
    );
    pb.set_message(file.name.clone());

    let bar = pb.clone();
    let on_progress: ProgressCallback = Arc::new(move |p: UploadProgress| bar.set_position(p.loaded));

    let result = match uploader.upload_file(&file, Some(on_progress)).await {
        Ok(result) => {
            pb.finish_with_message("Done");
            result
        }
        Err(e) => {
            pb.abandon_with_message("Failed");
            return Err(e.into());
        }
    };

    println!("{}", result.url);

    if let Some(path) = &args.draft {
        let mut store = FormStore::from_draft(crate::load_draft(path)?);
        store.push_reference(kind, result.to_reference(kind, &file.name));
        crate::save_draft(path, store.draft())?;
        eprintln!("Added reference {} to {}", kind.noun(), path.display());
    }

    Ok(())
}
