//! adstudio - AI campaign asset studio
//!
//! A terminal studio that:
//! - turns a creative brief into N distinct campaign variants via Gemini
//! - generates one Imagen visual per variant (single fallback attempt)
//! - attaches simulated A/B metrics and a recommendation
//! - exports campaign JSON plus a zip archive of images

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

use adstudio::campaign::{self, CreativeBrief, MAX_VARIANTS, build_variants};
use adstudio::config::{Config, DEFAULT_LOCATION, DEFAULT_VARIANT_COUNT};
use adstudio::export::{CampaignExport, write_image_archive};
use adstudio::llm::gemini::{DEFAULT_TEXT_MODEL, GeminiClient};
use adstudio::llm::imagen::{
    DEFAULT_FALLBACK_MODEL, DEFAULT_IMAGE_MODEL, ImageModel, ImagenClient, VertexTarget,
    generate_with_fallback,
};
use adstudio::repl::{self, Repl, colors};

#[derive(Parser)]
#[command(name = "adstudio")]
#[command(about = "AI campaign asset studio: A/B creative variants with Gemini and Imagen")]
struct Args {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY")]
    gemini_api_key: Option<String>,

    /// Google Cloud project id (routes image calls through Vertex AI)
    #[arg(long, env = "GOOGLE_CLOUD_PROJECT_ID")]
    project_id: Option<String>,

    /// Google Cloud region for Vertex AI
    #[arg(long, env = "GOOGLE_CLOUD_REGION")]
    location: Option<String>,

    /// Text generation model
    #[arg(long)]
    text_model: Option<String>,

    /// Primary image generation model
    #[arg(long)]
    image_model: Option<String>,

    /// Fallback image generation model, tried once if the primary fails
    #[arg(long)]
    image_fallback_model: Option<String>,

    /// Number of campaign variants to request per brief
    #[arg(long, short = 'n')]
    variants: Option<usize>,

    /// Generate once for this brief and exit (interactive session otherwise)
    #[arg(long)]
    brief: Option<String>,

    /// Also generate one image per variant (only with --brief)
    #[arg(long)]
    images: bool,

    /// Output directory for exports
    #[arg(long, short = 'o', default_value = "campaign_out")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (from ~/.adstudio/.env or current dir)
    let env_path = dirs::home_dir()
        .map(|h| h.join(".adstudio").join(".env"))
        .filter(|p| p.exists());
    if let Some(path) = env_path {
        let _ = dotenvy::from_path(&path);
    } else {
        let _ = dotenvy::dotenv(); // fallback to current dir
    }

    // Initialize logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Load config file (~/.adstudio/config.toml)
    let config = Config::load();

    // Resolve values: CLI args > env vars (handled by clap) > config file > defaults
    let api_key = args
        .gemini_api_key
        .or(config.gemini_api_key)
        .context("GEMINI_API_KEY required (set via --gemini-api-key, env var, or ~/.adstudio/config.toml)")?;

    let project_id = args.project_id.or(config.project_id);

    let location = args
        .location
        .or(config.location)
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

    let text_model = args
        .text_model
        .or(config.text_model)
        .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string());

    let image_model = args
        .image_model
        .or(config.image_model)
        .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());

    let fallback_model = args
        .image_fallback_model
        .or(config.image_fallback_model)
        .unwrap_or_else(|| DEFAULT_FALLBACK_MODEL.to_string());

    let variant_count = args
        .variants
        .or(config.variant_count)
        .unwrap_or(DEFAULT_VARIANT_COUNT);
    if variant_count == 0 || variant_count > MAX_VARIANTS {
        bail!("variant count must be between 1 and {}", MAX_VARIANTS);
    }

    use adstudio::repl::colors::ansi::*;

    // Pretty startup banner
    println!();
    println!("{}", colors::banner_accent(&format!("  adstudio {}", env!("CARGO_PKG_VERSION"))));
    println!("{}", colors::separator(50));
    println!("{}", colors::banner_line("Text model", &text_model));
    println!(
        "{}",
        colors::banner_line(
            "Image model",
            &format!("{} (fallback: {})", image_model, fallback_model)
        )
    );
    match &project_id {
        Some(project) => println!(
            "{}",
            colors::banner_line("Endpoint", &format!("Vertex AI ({} / {})", project, location))
        ),
        None => println!(
            "{}",
            colors::banner_line(
                "Endpoint",
                &format!("Generative Language API {}({} unused){}", DIM, location, RESET)
            )
        ),
    }
    println!("{}", colors::banner_line("Variants", &variant_count.to_string()));
    println!("{}", colors::separator(50));
    println!();

    let gemini = GeminiClient::with_model(api_key.clone(), text_model);

    let vertex = project_id.map(|project_id| VertexTarget {
        project_id,
        location,
    });
    let primary = ImagenClient::new(api_key.clone(), image_model, vertex.clone())
        .context("failed to build image client")?;
    let fallback = ImagenClient::new(api_key, fallback_model, vertex)
        .context("failed to build fallback image client")?;

    match args.brief {
        Some(brief) => {
            run_once(
                gemini,
                Box::new(primary),
                Box::new(fallback),
                &brief,
                variant_count,
                args.images,
                &args.out,
            )
            .await
        }
        None => {
            let mut repl = Repl::new(
                gemini,
                Box::new(primary),
                Box::new(fallback),
                variant_count,
                args.out,
            )?;
            repl.run().await
        }
    }
}

/// One non-interactive pass: generate, render, export.
async fn run_once(
    gemini: GeminiClient,
    primary: Box<dyn ImageModel>,
    fallback: Box<dyn ImageModel>,
    brief: &str,
    variant_count: usize,
    with_images: bool,
    out: &Path,
) -> Result<()> {
    // Validate before any API call is made
    let brief = CreativeBrief::new(brief)?;

    let assets = gemini
        .generate_variants(&brief, variant_count)
        .await
        .context("campaign generation failed")?;
    let variants = build_variants(assets);

    repl::render_campaign(&brief, &variants);

    let mut images: std::collections::HashMap<String, Vec<u8>> = Default::default();
    if with_images {
        for variant in &variants {
            println!(
                "{}",
                colors::status(&format!("Generating image for variant {}...", variant.label))
            );
            match generate_with_fallback(
                primary.as_ref(),
                fallback.as_ref(),
                &variant.asset.image_prompt,
            )
            .await
            {
                Ok(bytes) => {
                    images.insert(variant.label.clone(), bytes);
                }
                Err(e) => println!(
                    "{}",
                    colors::error(&format!(
                        "Image generation for variant {} failed: {}",
                        variant.label, e
                    ))
                ),
            }
        }
    }

    let export = CampaignExport::new(&brief, &variants);
    let path = export.write_to(out)?;
    println!("{}", colors::success(&format!("Wrote {}", path.display())));

    if !images.is_empty() {
        let path = write_image_archive(out, &images)?;
        println!("{}", colors::success(&format!("Wrote {}", path.display())));
    }

    if let Some(best) = campaign::recommend(&variants) {
        tracing::info!(recommended = %best.label, "campaign complete");
    }

    Ok(())
}
