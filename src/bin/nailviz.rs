//! CLI for NailViz - AI nail art try-on.

use clap::{Args, Parser, Subcommand};
use nailviz::present::{banners, DownloadArtifact};
use nailviz::{Config, OpenAiImageModel, RunInput, RunOutcome, StyleDescription, UploadedImage};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nailviz")]
#[command(about = "Try on nail art: upload a hand photo, describe a style, get an edited photo")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    provider: ProviderArgs,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the web UI
    Serve(ServeArgs),

    /// Run once on a local photo
    Generate(GenerateArgs),
}

#[derive(Args)]
struct ProviderArgs {
    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// API base URL
    #[arg(long, env = "NAILVIZ_BASE_URL", default_value = nailviz::DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Image edit model (gpt-image-1 or dall-e-2)
    #[arg(long, env = "NAILVIZ_EDIT_MODEL", default_value = "gpt-image-1", global = true)]
    edit_model: OpenAiImageModel,

    /// Vision model used to validate the photo
    #[arg(long, env = "NAILVIZ_VISION_MODEL", default_value = nailviz::vision::DEFAULT_VISION_MODEL, global = true)]
    vision_model: String,

    /// Check the photo with the vision model before editing
    #[arg(
        long,
        env = "NAILVIZ_VALIDATE",
        default_value_t = true,
        action = clap::ArgAction::Set,
        global = true
    )]
    validate: bool,

    /// Directory for per-run scratch files (default: system temp dir)
    #[arg(long, env = "NAILVIZ_SCRATCH_DIR", global = true)]
    scratch_dir: Option<PathBuf>,

    /// Timeout for each provider call, in seconds
    #[arg(long, env = "NAILVIZ_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Args)]
struct ServeArgs {
    /// Listen address
    #[arg(long, env = "NAILVIZ_BIND", default_value = nailviz::DEFAULT_BIND)]
    bind: SocketAddr,

    /// Largest accepted upload, in bytes
    #[arg(long, env = "NAILVIZ_MAX_UPLOAD_BYTES", default_value_t = nailviz::DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,
}

#[derive(Args)]
struct GenerateArgs {
    /// Hand photo (jpg, jpeg or png)
    #[arg(short, long)]
    input: PathBuf,

    /// Nail art style, e.g. "galaxy theme"
    #[arg(short, long)]
    style: String,

    /// Where to write the edited image
    #[arg(short, long, default_value = nailviz::present::RESULT_FILE_NAME)]
    output: PathBuf,
}

impl ProviderArgs {
    fn into_config(self) -> Config {
        Config {
            api_key: self.api_key,
            base_url: self.base_url,
            edit_model: self.edit_model,
            vision_model: self.vision_model,
            validate: self.validate,
            scratch_dir: self.scratch_dir.unwrap_or_else(std::env::temp_dir),
            timeout: self.timeout_secs.map(Duration::from_secs),
            ..Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.provider.into_config();

    match cli.command {
        Commands::Serve(args) => {
            serve(
                Config {
                    bind: args.bind,
                    max_upload_bytes: args.max_upload_bytes,
                    ..config
                },
            )
            .await?;
        }
        Commands::Generate(args) => {
            generate(&config, args, cli.json).await?;
        }
    }

    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let pipeline = Arc::new(config.pipeline()?);
    tracing::info!(
        edit_model = %config.edit_model,
        vision_model = %config.vision_model,
        validate = config.validate,
        scratch_dir = %config.scratch_dir.display(),
        max_upload_bytes = config.max_upload_bytes,
        "starting web UI"
    );
    let app = nailviz::web::router(pipeline, config.max_upload_bytes);
    nailviz::web::serve(config.bind, app).await?;
    Ok(())
}

async fn generate(config: &Config, args: GenerateArgs, json_output: bool) -> anyhow::Result<()> {
    let pipeline = config.pipeline()?;
    let input = RunInput::new(
        UploadedImage::from_path(&args.input)?,
        StyleDescription::new(&args.style)?,
    );

    let outcome = pipeline.run(&input).await;
    if let Some(image) = outcome.image() {
        image.save(&args.output)?;
    }

    if json_output {
        let mut result = serde_json::json!({
            "status": outcome.status(),
            "validated": outcome.validated(),
            "validation_enabled": pipeline.validates(),
            "messages": banners(&outcome),
        });
        if let Some(image) = outcome.image() {
            let artifact = DownloadArtifact::new(image);
            result["output"] = args.output.display().to_string().into();
            result["size_bytes"] = image.size().into();
            result["mime_type"] = artifact.mime_type.into();
            result["model"] = image.metadata.model.clone().into();
            result["duration_ms"] = image.metadata.duration_ms.into();
        }
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for banner in banners(&outcome) {
            println!("[{}] {}", banner.kind.as_str(), banner.message);
        }
        if let Some(image) = outcome.image() {
            println!(
                "Generated image: {} ({} bytes)",
                args.output.display(),
                image.size()
            );
            if let Some(duration) = image.metadata.duration_ms {
                println!("Duration: {}ms", duration);
            }
        }
    }

    match outcome {
        RunOutcome::Generated { .. } => Ok(()),
        RunOutcome::Rejected { .. } => anyhow::bail!("hand photo was rejected"),
        RunOutcome::Failed { error, .. } => Err(error.into()),
    }
}
