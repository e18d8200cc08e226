//! The `prism models` command for managing tagger models.
//!
//! Models are fetched from their published repositories into the local
//! model directory; the tagging pipeline itself never touches the
//! network. Downloads are plain streaming fetches with no retries and no
//! partial-download resume.

use std::path::Path;

use clap::{Args, Subcommand};
use prism_core::model::{DirectorySource, LABELS_FILENAME, WEIGHTS_FILENAME};
use prism_core::Config;

/// Arguments for the `models` command.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Subcommands for model management.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// Download a tagger model (weights + label table)
    Download {
        /// Model alias or repository id (defaults to the configured model)
        model: Option<String>,
    },

    /// List known models and their install status
    List,

    /// Show model directory path
    Path,
}

/// A known tagger model variant.
struct ModelVariant {
    alias: &'static str,
    repo: &'static str,
    label: &'static str,
}

const TAGGER_VARIANTS: &[ModelVariant] = &[
    ModelVariant {
        alias: "swinv2-v3",
        repo: "SmilingWolf/wd-swinv2-tagger-v3",
        label: "SwinV2 v3 (recommended)",
    },
    ModelVariant {
        alias: "convnext-v3",
        repo: "SmilingWolf/wd-convnext-tagger-v3",
        label: "ConvNext v3",
    },
    ModelVariant {
        alias: "vit-v3",
        repo: "SmilingWolf/wd-vit-tagger-v3",
        label: "ViT v3",
    },
    ModelVariant {
        alias: "eva02-large-v3",
        repo: "SmilingWolf/wd-eva02-large-tagger-v3",
        label: "EVA02 Large v3",
    },
    ModelVariant {
        alias: "moat-v2",
        repo: "SmilingWolf/wd-v1-4-moat-tagger-v2",
        label: "MOAT v2",
    },
    ModelVariant {
        alias: "swinv2-v2",
        repo: "SmilingWolf/wd-v1-4-swinv2-tagger-v2",
        label: "SwinV2 v2",
    },
    ModelVariant {
        alias: "convnext-v2",
        repo: "SmilingWolf/wd-v1-4-convnext-tagger-v2",
        label: "ConvNext v2",
    },
    ModelVariant {
        alias: "convnextv2-v2",
        repo: "SmilingWolf/wd-v1-4-convnextv2-tagger-v2",
        label: "ConvNextV2 v2",
    },
    ModelVariant {
        alias: "vit-v2",
        repo: "SmilingWolf/wd-v1-4-vit-tagger-v2",
        label: "ViT v2",
    },
];

/// Resolve a command-line model name: a known alias maps to its
/// repository id, anything else passes through unchanged.
pub fn resolve_model_id(name: &str) -> String {
    TAGGER_VARIANTS
        .iter()
        .find(|v| v.alias == name)
        .map(|v| v.repo.to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Execute the models command.
pub async fn execute(args: ModelsArgs, config: Config) -> anyhow::Result<()> {
    match args.command {
        ModelsCommand::Download { model } => {
            let model_id = resolve_model_id(
                model
                    .as_deref()
                    .unwrap_or(config.model.default_model.as_str()),
            );
            let client = reqwest::Client::new();
            download_model(&model_id, &config, &client).await?;
            tracing::info!("All downloads complete.");
        }

        ModelsCommand::List => {
            let model_dir = config.model_dir();
            let source = DirectorySource::new(&model_dir);

            println!("Known tagger models:");
            println!("  Directory: {}\n", model_dir.display());

            for variant in TAGGER_VARIANTS {
                let status = if source.is_installed(variant.repo) {
                    "ready"
                } else {
                    "not installed"
                };
                let default_marker = if variant.repo == config.model.default_model {
                    "  (default)"
                } else {
                    ""
                };
                println!(
                    "  - {:16} {:24} {:14}{}",
                    variant.alias, variant.label, status, default_marker
                );
            }
            println!(
                "\n  Each model ships its own {} alongside {}.",
                LABELS_FILENAME, WEIGHTS_FILENAME
            );
        }

        ModelsCommand::Path => {
            println!("{}", config.model_dir().display());
        }
    }

    Ok(())
}

/// Download a model's weights and label table. Skips files already on disk.
pub async fn download_model(
    model_id: &str,
    config: &Config,
    client: &reqwest::Client,
) -> anyhow::Result<()> {
    let model_dir = config.model_dir().join(model_id);

    for filename in [LABELS_FILENAME, WEIGHTS_FILENAME] {
        let dest = model_dir.join(filename);
        if dest.exists() {
            tracing::info!("{} already exists at {:?}", filename, dest);
            continue;
        }

        std::fs::create_dir_all(&model_dir)?;

        let url = format!("https://huggingface.co/{model_id}/resolve/main/{filename}");

        tracing::info!("Downloading {} for {}...", filename, model_id);
        tracing::info!("  Source: {}", url);
        tracing::info!("  Destination: {:?}", dest);

        download_file(client, &url, &dest).await?;

        let file_size = std::fs::metadata(&dest)?.len();
        tracing::info!(
            "  {} complete ({:.1} MB)",
            filename,
            file_size as f64 / (1024.0 * 1024.0)
        );
    }

    Ok(())
}

/// Download a file from a URL to a local path, streaming to disk.
///
/// An `HF_TOKEN` environment variable, when set, is sent as a bearer
/// token for gated repositories. A failed download removes the partial
/// file so the next run starts clean.
async fn download_file(client: &reqwest::Client, url: &str, dest: &Path) -> anyhow::Result<()> {
    use futures_util::StreamExt;
    use tokio::io::AsyncWriteExt;

    let mut request = client.get(url);
    if let Ok(token) = std::env::var("HF_TOKEN") {
        if !token.is_empty() {
            request = request.bearer_auth(token);
        }
    }

    let response = request
        .send()
        .await?
        .error_for_status()
        .map_err(|e| anyhow::anyhow!("Download failed: {e}"))?;

    let total_size = response.content_length();
    if let Some(size) = total_size {
        tracing::info!("  Size: {:.1} MB", size as f64 / (1024.0 * 1024.0));
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(dest).await;
                return Err(e.into());
            }
        };
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;

        if let Some(total) = total_size {
            if downloaded % (50 * 1024 * 1024) < chunk.len() as u64 {
                tracing::info!(
                    "  Progress: {:.0}%",
                    downloaded as f64 / total as f64 * 100.0
                );
            }
        }
    }

    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_resolves_to_repo() {
        assert_eq!(
            resolve_model_id("swinv2-v3"),
            "SmilingWolf/wd-swinv2-tagger-v3"
        );
        assert_eq!(
            resolve_model_id("eva02-large-v3"),
            "SmilingWolf/wd-eva02-large-tagger-v3"
        );
    }

    #[test]
    fn test_unknown_name_passes_through() {
        assert_eq!(
            resolve_model_id("someone/custom-tagger"),
            "someone/custom-tagger"
        );
    }

    #[test]
    fn test_no_duplicate_aliases() {
        let mut seen = std::collections::HashSet::new();
        for variant in TAGGER_VARIANTS {
            assert!(seen.insert(variant.alias), "duplicate: {}", variant.alias);
        }
    }
}
