use base64::{engine::general_purpose, Engine as _};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use discord_media_uploader::{
    AppResult, FileUploader, ImageUploader, MediaUploader, UploadResult, UploaderConfig,
};

#[derive(Parser, Debug)]
#[command(version, about = "Upload media to a Discord channel")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload one or more files unchanged
    Files {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Upload a base64-encoded image along with a generated thumbnail
    Image {
        /// Base64 image data
        #[arg(required_unless_present = "from_file", conflicts_with = "from_file")]
        base64: Option<String>,
        /// Read the image from a file and encode it first
        #[arg(long)]
        from_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(results) => match serde_json::to_string_pretty(&results) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to render results: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            log::error!("Upload failed: {}", e);
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<Vec<UploadResult>> {
    let config = UploaderConfig::from_env()?;
    log::info!("Starting upload to channel {}", config.channel_id());

    let results = match command {
        Command::Files { paths } => upload_with(FileUploader::new(config)?, paths).await?,
        Command::Image { base64, from_file } => {
            let input = match (base64, from_file) {
                (_, Some(path)) => general_purpose::STANDARD.encode(tokio::fs::read(&path).await?),
                (Some(data), None) => data,
                (None, None) => anyhow::bail!("No image given"),
            };
            upload_with(ImageUploader::new(config)?, input).await?
        }
    };

    Ok(results)
}

async fn upload_with<U: MediaUploader>(uploader: U, input: U::Input) -> AppResult<Vec<UploadResult>> {
    uploader.upload(input).await
}
