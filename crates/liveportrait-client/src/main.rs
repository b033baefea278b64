//! Command-line uploader for the LivePortrait proxy.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::parser::ValueSource;
use clap::{CommandFactory, FromArgMatches, Parser};
use liveportrait_models::catalog::examples;
use liveportrait_models::{find_example, MediaKind, DOWNLOAD_FILE_NAME};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use liveportrait_client::{
    load_media_file, ClientError, ClientResult, CredentialStore, FileCredentialStore,
    GenerateOutcome, HttpProxyTransport, MediaSource, ProxyTransport, Uploader,
};

/// Animate a portrait with a driving video.
#[derive(Debug, Parser)]
#[command(name = "liveportrait", version, about)]
struct Cli {
    /// Base URL of the proxy server
    #[arg(long, env = "LIVEPORTRAIT_SERVER", default_value = "http://localhost:8000")]
    server: String,

    /// Portrait image to upload
    #[arg(long, conflicts_with = "example_portrait")]
    image: Option<PathBuf>,

    /// Bundled example portrait, by label or 1-based index
    #[arg(long)]
    example_portrait: Option<String>,

    /// Driving video to upload
    #[arg(long, conflicts_with = "example_video")]
    video: Option<PathBuf>,

    /// Bundled example driving video, by label or 1-based index
    #[arg(long)]
    example_video: Option<String>,

    /// HuggingFace API key; saved for later runs (empty string clears it).
    /// A value taken from the environment is used for this run only.
    #[arg(long, env = "LIVEPORTRAIT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Where the API key is saved
    #[arg(long)]
    credential_file: Option<PathBuf>,

    /// Output path of the generated video
    #[arg(long, short, default_value = DOWNLOAD_FILE_NAME)]
    output: PathBuf,

    /// Print the bundled examples and exit
    #[arg(long)]
    list_examples: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    if rustls::crypto::ring::default_provider().install_default().is_err() {
        warn!("A rustls crypto provider was already installed");
    }

    let matches = Cli::command().get_matches();
    let api_key_source = matches.value_source("api_key");
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    if cli.list_examples {
        print_examples();
        return Ok(());
    }

    let image = select_source(MediaKind::Image, cli.image, cli.example_portrait).await?;
    let video = select_source(MediaKind::Video, cli.video, cli.example_video).await?;

    let store = FileCredentialStore::new(
        cli.credential_file
            .unwrap_or_else(FileCredentialStore::default_path),
    );
    let transport = HttpProxyTransport::new(&cli.server)?;
    let uploader = Uploader::new(transport, store);

    if let Some(raw) = cli.api_key.as_deref() {
        apply_api_key(&uploader, raw, api_key_source)
            .await
            .context("Failed to save API key")?;
    }

    uploader.select_image(image).await;
    uploader.select_video(video).await;

    info!(server = %cli.server, "Generating talking avatar");

    match uploader.generate().await {
        GenerateOutcome::Completed(result) => {
            let video = result
                .decode()
                .map_err(ClientError::from)
                .context("Server returned an unreadable video")?;
            tokio::fs::write(&cli.output, &video)
                .await
                .with_context(|| format!("Failed to write {}", cli.output.display()))?;
            println!("Saved {} ({} bytes)", cli.output.display(), video.len());
            Ok(())
        }
        GenerateOutcome::Failed(message) => bail!(message),
        other => bail!("Generation did not run: {:?}", other),
    }
}

/// Flag values are saved like an edit in the UI; environment values are not.
async fn apply_api_key<T, S>(
    uploader: &Uploader<T, S>,
    raw: &str,
    source: Option<ValueSource>,
) -> ClientResult<()>
where
    T: ProxyTransport,
    S: CredentialStore,
{
    if source == Some(ValueSource::EnvVariable) {
        uploader.use_credential(raw).await;
        Ok(())
    } else {
        uploader.set_credential(raw).await
    }
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let mut env_filter = EnvFilter::from_default_env();
    if let Ok(directive) = "liveportrait=info".parse() {
        env_filter = env_filter.add_directive(directive);
    }

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .with(env_filter)
            .init();
    }
}

fn print_examples() {
    for kind in [MediaKind::Image, MediaKind::Video] {
        println!("{} examples:", kind);
        for (index, asset) in examples(kind).iter().enumerate() {
            println!("  {}. {:<12} {}", index + 1, asset.label, asset.src);
        }
    }
}

async fn select_source(
    kind: MediaKind,
    path: Option<PathBuf>,
    example: Option<String>,
) -> Result<MediaSource> {
    if let Some(path) = path {
        let payload = load_media_file(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if !kind.matches(payload.content_type_or_default()) {
            warn!(
                file = %path.display(),
                content_type = payload.content_type_or_default(),
                "File does not look like a {} upload",
                kind
            );
        }
        return Ok(MediaSource::Uploaded(payload));
    }

    match example {
        Some(key) => find_example(kind, &key)
            .map(MediaSource::Example)
            .ok_or_else(|| anyhow!("Unknown {} example: {}", kind, key)),
        None => match kind {
            MediaKind::Image => bail!("Provide --image or --example-portrait"),
            MediaKind::Video => bail!("Provide --video or --example-video"),
        },
    }
}
