//! The `prism tag` command: run the tagging pipeline over images.

use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use prism_core::{
    decode, CategoricalStyle, Config, DirectorySource, OutputFormat, OutputWriter,
    PredictOptions, Prediction, Predictor, ThresholdPolicy,
};

use super::discover::FileDiscovery;
use super::models::resolve_model_id;

/// Arguments for the `tag` command.
#[derive(Args, Debug)]
pub struct TagArgs {
    /// Image files or directories to tag
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Model alias or repository id (defaults to the configured model)
    #[arg(long, short)]
    pub model: Option<String>,

    /// Fixed threshold for general tags
    #[arg(long)]
    pub general_thresh: Option<f32>,

    /// Use adaptive MCut thresholding for general tags
    #[arg(long)]
    pub general_mcut: bool,

    /// Fixed threshold for character tags
    #[arg(long)]
    pub character_thresh: Option<f32>,

    /// Use adaptive MCut thresholding for character tags
    #[arg(long)]
    pub character_mcut: bool,

    /// Fixed threshold for rating tags
    #[arg(long)]
    pub rating_thresh: Option<f32>,

    /// Print the imageboard dialect instead of the standard tag string
    #[arg(long)]
    pub categorical: bool,

    /// Render the enriched imageboard dialect (bucketed, NSFW last)
    #[arg(long)]
    pub enriched: bool,

    /// Output format: text, json, or jsonl (defaults from config)
    #[arg(long, short)]
    pub format: Option<String>,

    /// Write output to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// One output record: the source path plus its prediction.
#[derive(Debug, Serialize)]
struct TaggedFile {
    path: PathBuf,
    #[serde(flatten)]
    prediction: Prediction,
}

/// Execute the tag command.
pub async fn execute(args: TagArgs, config: Config) -> anyhow::Result<()> {
    let files = FileDiscovery::new(config.processing.clone()).discover_all(&args.paths);
    if files.is_empty() {
        anyhow::bail!("No supported image files found under the given paths.");
    }
    tracing::info!("Tagging {} image(s)", files.len());

    let format = output_format(&args, &config)?;
    let model_id = resolve_model_id(
        args.model
            .as_deref()
            .unwrap_or(config.model.default_model.as_str()),
    );
    let options = predict_options(&args, &config, model_id);
    let print_categorical = args.categorical || args.enriched;

    // Decoding and inference are CPU-bound; keep them off the async runtime.
    let records = tokio::task::spawn_blocking({
        let config = config.clone();
        move || tag_files(files, config, options)
    })
    .await?;

    let failed = records.iter().filter(|r| r.prediction.is_error()).count();

    match format {
        None => {
            for record in &records {
                let line = if record.prediction.is_error() {
                    record.prediction.standard.as_str()
                } else if print_categorical {
                    record.prediction.categorical.as_str()
                } else {
                    record.prediction.standard.as_str()
                };
                println!("{}: {}", record.path.display(), line);
            }
        }
        Some(format) => write_records(&records, format, &config, args.output.as_deref())?,
    }

    if failed > 0 {
        tracing::warn!("{} of {} image(s) failed", failed, records.len());
    }
    Ok(())
}

/// Run the synchronous tagging loop with a progress bar for batches.
fn tag_files(files: Vec<PathBuf>, config: Config, options: PredictOptions) -> Vec<TaggedFile> {
    let source = DirectorySource::new(config.model_dir());
    let predictor = Predictor::new(config, Box::new(source));

    let progress = if files.len() > 1 {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                .expect("static progress template"),
        );
        Some(bar)
    } else {
        None
    };

    let records: Vec<TaggedFile> = files
        .into_iter()
        .map(|path| {
            if let Some(bar) = &progress {
                bar.set_message(
                    path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                );
            }
            let prediction = match decode::load_image(&path) {
                Ok(image) => predictor.predict(Some(&image), &options),
                Err(e) => Prediction::from_error(e.to_string()),
            };
            if let Some(bar) = &progress {
                bar.inc(1);
            }
            TaggedFile { path, prediction }
        })
        .collect();

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }
    records
}

/// Resolve threshold policies from flags and configured defaults.
fn predict_options(args: &TagArgs, config: &Config, model_id: String) -> PredictOptions {
    let general = if args.general_mcut {
        ThresholdPolicy::AdaptiveMaxCut {
            floor: config.thresholds.general_mcut_floor,
        }
    } else {
        ThresholdPolicy::Fixed(args.general_thresh.unwrap_or(config.thresholds.general))
    };

    let character = if args.character_mcut {
        ThresholdPolicy::AdaptiveMaxCut {
            floor: config.thresholds.character_mcut_floor,
        }
    } else {
        ThresholdPolicy::Fixed(args.character_thresh.unwrap_or(config.thresholds.character))
    };

    PredictOptions {
        model_id,
        general,
        character,
        rating_threshold: args.rating_thresh.unwrap_or(config.thresholds.rating),
        categorical_style: if args.enriched {
            CategoricalStyle::Enriched
        } else {
            CategoricalStyle::Plain
        },
    }
}

/// Resolve the structured output format; `None` means plain text.
fn output_format(args: &TagArgs, config: &Config) -> anyhow::Result<Option<OutputFormat>> {
    let name = args.format.as_deref().unwrap_or(&config.output.format);
    if name.eq_ignore_ascii_case("text") {
        return Ok(None);
    }
    OutputFormat::parse(name)
        .map(Some)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {name}"))
}

/// Write structured records to stdout or the requested file.
fn write_records(
    records: &[TaggedFile],
    format: OutputFormat,
    config: &Config,
    output: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            let mut writer = OutputWriter::new(file, format, config.output.pretty);
            writer.write_all(records)?;
            writer.flush()?;
            tracing::info!("Wrote {} record(s) to {}", writer.count(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = OutputWriter::new(stdout.lock(), format, config.output.pretty);
            writer.write_all(records)?;
            writer.flush()?;
        }
    }
    Ok(())
}
