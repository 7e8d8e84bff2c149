use std::io::Read;
use std::path::PathBuf;

use clap::Parser;

use paperjet::{render, RenderConfig, RenderRequest, RenderResponse};

/// Render an HTML document to PDF with headless Chrome.
///
/// Reads one JSON request from stdin (or --input), writes one JSON response
/// to stdout. Failures come back as `{"error": ...}` with a normal exit.
#[derive(Parser)]
#[command(name = "paperjet", version, about)]
struct Args {
    /// Read the JSON request from this file instead of stdin
    #[arg(long)]
    input: Option<PathBuf>,

    /// Chrome executable to launch; auto-detected when absent
    #[arg(long, env = "CHROME")]
    chrome: Option<PathBuf>,

    /// Region used for object-storage uploads and reference URLs
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut config = RenderConfig::default();
    config.chrome_path = args.chrome;
    if let Some(region) = args.region {
        config.region = region;
    }

    let response = match serde_json::from_str::<RenderRequest>(&raw) {
        Ok(request) => render(request, &config).await,
        Err(e) => RenderResponse::Failure {
            error: format!("malformed request: {}", e),
        },
    };

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
