//! Campaign export: a JSON document plus a zip archive of generated images.
//!
//! No schema versioning and no integrity checks; the JSON is expected to
//! round-trip through [`CampaignExport::parse`].

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::campaign::{CampaignVariant, CreativeBrief, recommend};

/// File name for the structured campaign document.
pub const CAMPAIGN_FILE: &str = "campaign_assets.json";
/// File name for the image archive.
pub const IMAGE_ARCHIVE: &str = "campaign_images.zip";

/// The exported campaign document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignExport {
    pub campaign_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub creative_brief: String,
    pub variants: Vec<CampaignVariant>,
    /// Label of the recommended variant, if any variants exist.
    pub recommendation: Option<String>,
}

impl CampaignExport {
    pub fn new(brief: &CreativeBrief, variants: &[CampaignVariant]) -> Self {
        Self {
            campaign_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            creative_brief: brief.as_str().to_string(),
            variants: variants.to_vec(),
            recommendation: recommend(variants).map(|v| v.label.clone()),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize campaign export")
    }

    /// Parse a previously exported document.
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse campaign export")
    }

    /// Write the document to `dir/campaign_assets.json`, creating `dir` if
    /// needed. Returns the written path.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create export dir {}", dir.display()))?;

        let path = dir.join(CAMPAIGN_FILE);
        fs::write(&path, self.to_json()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Package generated images into `dir/campaign_images.zip`, one
/// `variant_{label}_image.png` entry per variant, in label order.
pub fn write_image_archive<'a, I>(dir: impl AsRef<Path>, images: I) -> Result<PathBuf>
where
    I: IntoIterator<Item = (&'a String, &'a Vec<u8>)>,
{
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export dir {}", dir.display()))?;

    let path = dir.join(IMAGE_ARCHIVE);
    let file = File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut archive = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    let mut entries: Vec<(&String, &Vec<u8>)> = images.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (label, bytes) in entries {
        archive
            .start_file(image_entry_name(label), options)
            .with_context(|| format!("failed to add archive entry for variant {}", label))?;
        archive.write_all(bytes)?;
    }

    archive.finish().context("failed to finalize image archive")?;
    Ok(path)
}

/// Archive entry name for one variant image.
pub fn image_entry_name(label: &str) -> String {
    format!("variant_{}_image.png", label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::{CampaignAsset, ColorPalette, build_variants};

    fn sample_campaign() -> (CreativeBrief, Vec<CampaignVariant>) {
        let brief = CreativeBrief::new("eco-friendly sneaker launch").unwrap();
        let assets = vec![
            CampaignAsset {
                slogan: "Walk Lighter".into(),
                image_prompt: "forest floor, morning light".into(),
                color_palette: ColorPalette {
                    primary: "#2E7D32".into(),
                    secondary: "#F1F8E9".into(),
                    accent: "#FF8F00".into(),
                },
                font_recommendation: "Lato".into(),
            },
            CampaignAsset {
                slogan: "Steps That Matter".into(),
                image_prompt: "city crosswalk, bold shapes".into(),
                color_palette: ColorPalette {
                    primary: "#1565C0".into(),
                    secondary: "#E3F2FD".into(),
                    accent: "#FFC107".into(),
                },
                font_recommendation: "Raleway".into(),
            },
        ];
        (brief, build_variants(assets))
    }

    #[test]
    fn test_json_roundtrip() {
        let (brief, variants) = sample_campaign();
        let export = CampaignExport::new(&brief, &variants);

        let parsed = CampaignExport::parse(&export.to_json().unwrap()).unwrap();
        assert_eq!(parsed, export);
        assert_eq!(parsed.creative_brief, brief.as_str());
        assert_eq!(parsed.variants, variants);
    }

    #[test]
    fn test_recommendation_present() {
        let (brief, variants) = sample_campaign();
        let export = CampaignExport::new(&brief, &variants);
        let label = export.recommendation.as_deref().unwrap();
        assert!(label == "A" || label == "B");
    }

    #[test]
    fn test_entry_name() {
        assert_eq!(image_entry_name("A"), "variant_A_image.png");
    }
}
