//! Interactive REPL for the campaign studio.
//!
//! Plain input is treated as a creative brief: one text-generation call,
//! simulated metrics, and a rendered comparison of the variants. Slash
//! commands drive image generation and export. Errors from either
//! upstream API are printed and the loop continues; every submission is
//! independent.

pub mod colors;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;

use crate::campaign::{CampaignVariant, CreativeBrief, build_variants, recommend};
use crate::export::{CampaignExport, write_image_archive};
use crate::llm::gemini::GeminiClient;
use crate::llm::imagen::{ImageModel, generate_with_fallback};
use crate::session::Session;

/// REPL state
pub struct Repl {
    /// Readline editor with history
    editor: DefaultEditor,
    /// Text generation client
    gemini: GeminiClient,
    /// Primary image model
    primary: Box<dyn ImageModel>,
    /// Fallback image model, tried once per image when the primary fails
    fallback: Box<dyn ImageModel>,
    /// Current campaign state
    session: Session,
    /// Variants requested per brief
    variant_count: usize,
    /// Default export directory
    export_dir: PathBuf,
    /// History file path
    history_path: PathBuf,
}

impl Repl {
    pub fn new(
        gemini: GeminiClient,
        primary: Box<dyn ImageModel>,
        fallback: Box<dyn ImageModel>,
        variant_count: usize,
        export_dir: PathBuf,
    ) -> Result<Self> {
        let editor = DefaultEditor::new()?;

        // History file in ~/.adstudio/history
        let history_path = dirs::home_dir()
            .unwrap_or_default()
            .join(".adstudio")
            .join("history");

        Ok(Self {
            editor,
            gemini,
            primary,
            fallback,
            session: Session::new(),
            variant_count,
            export_dir,
            history_path,
        })
    }

    /// Load command history
    fn load_history(&mut self) {
        if self.history_path.exists() {
            let _ = self.editor.load_history(&self.history_path);
        }
    }

    /// Save command history
    fn save_history(&mut self) {
        if let Some(parent) = self.history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = self.editor.save_history(&self.history_path);
    }

    /// Run the REPL loop
    pub async fn run(&mut self) -> Result<()> {
        self.load_history();

        println!("Type a creative brief (Ctrl+D to exit, /help for commands)");
        println!();

        loop {
            let readline = self.editor.readline(&colors::prompt());

            match readline {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    self.editor.add_history_entry(&line)?;

                    // Handle slash commands
                    if trimmed.starts_with('/') {
                        self.handle_command(trimmed).await?;
                        continue;
                    }

                    // Anything else is a creative brief
                    self.process_brief(trimmed).await?;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        self.save_history();
        Ok(())
    }

    /// Handle slash commands
    async fn handle_command(&mut self, cmd: &str) -> Result<()> {
        let parts: Vec<&str> = cmd.splitn(2, ' ').collect();
        let command = parts[0];
        let arg = parts.get(1).copied().unwrap_or("").trim();

        match command {
            "/help" => {
                println!("Commands:");
                println!("  /help           - Show this help");
                println!("  /show           - Show the current campaign");
                println!("  /images         - Generate an image for every variant");
                println!("  /image <label>  - Generate an image for one variant");
                println!("  /metrics        - Re-roll the simulated metrics");
                println!("  /export [dir]   - Write campaign JSON + image archive");
                println!("  /clear          - Discard the current campaign");
                println!("  /version        - Show version info");
                println!("  /quit           - Exit");
            }
            "/show" => {
                if self.session.has_campaign() {
                    self.render_campaign();
                } else {
                    println!("No campaign yet. Type a creative brief to generate one.");
                }
            }
            "/images" => {
                self.cmd_images().await;
            }
            "/image" => {
                if arg.is_empty() {
                    println!("Usage: /image <label>");
                } else {
                    self.cmd_image(arg).await;
                }
            }
            "/metrics" => {
                if self.session.has_campaign() {
                    self.session.reroll_metrics();
                    self.render_campaign();
                } else {
                    println!("No campaign yet. Type a creative brief to generate one.");
                }
            }
            "/export" => {
                self.cmd_export(arg);
            }
            "/clear" => {
                self.session.clear();
                println!("Campaign cleared.");
            }
            "/version" => {
                println!("adstudio v{}", env!("CARGO_PKG_VERSION"));
                println!("  Text model:  {}", self.gemini.model_name());
                println!(
                    "  Image model: {} (fallback: {})",
                    self.primary.model_id(),
                    self.fallback.model_id()
                );
            }
            "/quit" | "/exit" => {
                self.save_history();
                std::process::exit(0);
            }
            _ => {
                println!("Unknown command: {}. Try /help", command);
            }
        }
        Ok(())
    }

    /// Generate a campaign from a brief and render it.
    async fn process_brief(&mut self, input: &str) -> Result<()> {
        let brief = match CreativeBrief::new(input) {
            Ok(brief) => brief,
            Err(e) => {
                println!("{}", colors::error(&e.to_string()));
                return Ok(());
            }
        };

        println!(
            "{}",
            colors::status(&format!(
                "Generating {} campaign variants...",
                self.variant_count
            ))
        );

        match self
            .gemini
            .generate_variants(&brief, self.variant_count)
            .await
        {
            Ok(assets) => {
                self.session.set_campaign(brief, build_variants(assets));
                println!("{}", colors::success("Campaign variants generated."));
                println!();
                self.render_campaign();
            }
            Err(e) => {
                println!("{}", colors::error(&format!("Generation failed: {}", e)));
            }
        }

        Ok(())
    }

    fn render_campaign(&self) {
        if let Some(brief) = self.session.brief() {
            render_campaign(brief, self.session.variants());
        }
        let generated = self.session.images().len();
        if generated > 0 {
            println!(
                "{}",
                colors::status(&format!("{} image(s) generated. /export to save.", generated))
            );
        }
    }

    /// /images - generate an image for every variant, sequentially.
    async fn cmd_images(&mut self) {
        if !self.session.has_campaign() {
            println!("No campaign yet. Type a creative brief to generate one.");
            return;
        }

        let pending: Vec<(String, String)> = self
            .session
            .variants()
            .iter()
            .filter(|v| self.session.image(&v.label).is_none())
            .map(|v| (v.label.clone(), v.asset.image_prompt.clone()))
            .collect();

        if pending.is_empty() {
            println!("All variants already have images.");
            return;
        }

        for (label, prompt) in pending {
            self.generate_image(&label, &prompt).await;
        }
    }

    /// /image <label> - generate an image for one variant.
    async fn cmd_image(&mut self, label: &str) {
        let Some(variant) = self.session.variant(label) else {
            println!("No variant labeled '{}'. Try /show.", label);
            return;
        };
        let label = variant.label.clone();
        let prompt = variant.asset.image_prompt.clone();
        self.generate_image(&label, &prompt).await;
    }

    async fn generate_image(&mut self, label: &str, prompt: &str) {
        println!(
            "{}",
            colors::status(&format!("Generating image for variant {}...", label))
        );

        match generate_with_fallback(self.primary.as_ref(), self.fallback.as_ref(), prompt).await {
            Ok(bytes) => {
                println!(
                    "{}",
                    colors::success(&format!(
                        "Variant {} image ready ({} KiB).",
                        label,
                        bytes.len() / 1024
                    ))
                );
                self.session.store_image(label, bytes);
            }
            Err(e) => {
                println!(
                    "{}",
                    colors::error(&format!("Image generation for variant {} failed: {}", label, e))
                );
            }
        }
    }

    /// /export [dir] - write campaign JSON and, if present, the image archive.
    fn cmd_export(&mut self, arg: &str) {
        let Some(brief) = self.session.brief() else {
            println!("No campaign yet. Type a creative brief to generate one.");
            return;
        };

        let dir = if arg.is_empty() {
            self.export_dir.clone()
        } else {
            PathBuf::from(arg)
        };

        let export = CampaignExport::new(brief, self.session.variants());
        match export.write_to(&dir) {
            Ok(path) => println!("{}", colors::success(&format!("Wrote {}", path.display()))),
            Err(e) => {
                println!("{}", colors::error(&format!("Export failed: {:#}", e)));
                return;
            }
        }

        if self.session.images().is_empty() {
            println!("{}", colors::status("No generated images to archive."));
            return;
        }

        match write_image_archive(&dir, self.session.images()) {
            Ok(path) => println!("{}", colors::success(&format!("Wrote {}", path.display()))),
            Err(e) => println!("{}", colors::error(&format!("Archive failed: {:#}", e))),
        }
    }
}

/// Render a campaign: every variant plus the recommendation line.
pub fn render_campaign(brief: &CreativeBrief, variants: &[CampaignVariant]) {
    println!("{}", colors::header("Creative brief"));
    println!("  {}", brief);
    println!();

    for variant in variants {
        println!("{}", colors::header(&format!("Variant {}", variant.label)));
        println!("  Slogan      {}", colors::slogan(&variant.asset.slogan));
        println!("  Image       {}", variant.asset.image_prompt);
        let swatches = variant
            .asset
            .color_palette
            .entries()
            .map(|(hex, role)| format!("{} {}", colors::swatch(hex), role))
            .join("  ");
        println!("  Palette     {}", swatches);
        println!("  Font        {}", variant.asset.font_recommendation);
        println!(
            "  Simulated   CTR {:.2}%   Engagement {:.1}%   Conversion {:.2}%",
            variant.metrics.ctr, variant.metrics.engagement, variant.metrics.conversion
        );
        println!();
    }

    if let Some(best) = recommend(variants) {
        println!(
            "{}",
            colors::success(&format!(
                "Recommended: Variant {} (combined score {:.2})",
                best.label,
                best.metrics.combined_score()
            ))
        );
        println!();
    }
}
