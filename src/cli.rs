use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::fs;

use storyboard_studio::aspect::AspectRatio;
use storyboard_studio::config::Config;
use storyboard_studio::narration::narration_text;
use storyboard_studio::partition::PartitionMode;
use storyboard_studio::state::AppState;
use storyboard_studio::storyboard::{StoryboardImage, StoryboardRequest};

#[derive(Parser)]
#[command(name = "storyboard-cli")]
#[command(about = "Turn an idea or a script into a captioned storyboard", long_about = None)]
struct Cli {
    /// Config file (falls back to the environment when absent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a bulleted visual script from a short idea
    Script {
        /// The idea to expand
        prompt: String,
    },

    /// Illustrate an existing script
    Storyboard {
        /// Script text; use --file to read it from disk instead
        #[arg(short, long, conflicts_with = "file")]
        script: Option<String>,

        /// Read the script from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Number of images to request
        #[arg(short = 'n', long, default_value = "3")]
        count: usize,

        /// Aspect ratio: 16:9, 4:3, 1:1 or 9:16
        #[arg(short, long, default_value = "16:9")]
        ratio: String,

        /// Treat the script as a single caption
        #[arg(long)]
        reload: bool,

        /// Also write an MP3 narration of the captions
        #[arg(long)]
        narrate: Option<PathBuf>,
    },

    /// Generate a script from an idea and illustrate it
    Run {
        prompt: String,

        #[arg(short = 'n', long, default_value = "3")]
        count: usize,

        #[arg(short, long, default_value = "16:9")]
        ratio: String,

        #[arg(long)]
        narrate: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storyboard_studio=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path).await?,
        None => Config::discover().await?,
    };
    let state = AppState::from_config(config)?;

    match cli.command {
        Commands::Script { prompt } => {
            let script = state.scripts.generate(&prompt).await?;
            println!("{script}");
        }
        Commands::Storyboard {
            script,
            file,
            count,
            ratio,
            reload,
            narrate,
        } => {
            let script = match (script, file) {
                (Some(text), _) => text,
                (None, Some(path)) => fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read script: {}", path.display()))?,
                (None, None) => anyhow::bail!("either --script or --file is required"),
            };
            let mode = if reload {
                PartitionMode::ReuseWhole
            } else {
                PartitionMode::Fresh
            };
            let images = illustrate(&state, script, count, &ratio, mode).await?;
            finish(&state, &images, narrate).await?;
        }
        Commands::Run {
            prompt,
            count,
            ratio,
            narrate,
        } => {
            let script = state.scripts.generate(&prompt).await?;
            eprintln!("{script}\n");
            let images = illustrate(&state, script, count, &ratio, PartitionMode::Fresh).await?;
            finish(&state, &images, narrate).await?;
        }
    }

    Ok(())
}

async fn illustrate(
    state: &AppState,
    script: String,
    image_count: usize,
    ratio: &str,
    mode: PartitionMode,
) -> Result<Vec<StoryboardImage>> {
    let request = StoryboardRequest {
        script,
        image_count,
        aspect_ratio: AspectRatio::from_label(ratio),
        mode,
    };
    Ok(state.images.storyboard(&request).await?)
}

async fn finish(
    state: &AppState,
    images: &[StoryboardImage],
    narrate: Option<PathBuf>,
) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "images": images }))?);

    let Some(out_mp3) = narrate else {
        return Ok(());
    };
    let narrator = state
        .narrator
        .as_ref()
        .context("narration requested but elevenlabs_api_key is not configured")?;

    let text = narration_text(images.iter().map(|image| image.caption.as_str()));
    let audio = narrator.narrate(&text).await?;
    if let Some(parent) = out_mp3.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create dir {}", parent.display()))?;
    }
    fs::write(&out_mp3, &audio)
        .await
        .with_context(|| format!("Failed to write {}", out_mp3.display()))?;
    eprintln!("Narration written to {}", out_mp3.display());
    Ok(())
}
