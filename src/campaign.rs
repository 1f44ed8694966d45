//! Campaign data model: briefs, variants, and the recommendation rule.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::metrics::SimulatedMetrics;

/// Upper bound on variants per campaign; the prompt template only carries
/// this many distinct creative approaches.
pub const MAX_VARIANTS: usize = 8;

/// Errors from brief validation.
#[derive(Debug, Error, PartialEq)]
pub enum BriefError {
    #[error("creative brief must not be empty")]
    Empty,
}

/// User-supplied description of the desired campaign.
///
/// Validated non-empty at construction, before any API call is made.
#[derive(Debug, Clone, PartialEq)]
pub struct CreativeBrief(String);

impl CreativeBrief {
    pub fn new(text: impl Into<String>) -> Result<Self, BriefError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(BriefError::Empty);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CreativeBrief {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Three hex colors, ordered primary / secondary / accent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl ColorPalette {
    /// Ordered (value, role) pairs for rendering.
    pub fn entries(&self) -> [(&str, &'static str); 3] {
        [
            (self.primary.as_str(), "primary"),
            (self.secondary.as_str(), "secondary"),
            (self.accent.as_str(), "accent"),
        ]
    }
}

/// One creative option as returned by the text model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignAsset {
    pub slogan: String,
    pub image_prompt: String,
    pub color_palette: ColorPalette,
    pub font_recommendation: String,
}

/// A labeled variant with its simulated performance metrics.
///
/// Variants are independent; nothing relates one to another beyond being
/// generated from the same brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignVariant {
    pub label: String,
    #[serde(flatten)]
    pub asset: CampaignAsset,
    pub metrics: SimulatedMetrics,
}

/// Label for the variant at `index`: "A", "B", "C", ...
pub fn variant_label(index: usize) -> String {
    debug_assert!(index < 26);
    char::from(b'A' + (index % 26) as u8).to_string()
}

/// Assign labels and fresh simulated metrics to parsed assets, in order.
pub fn build_variants(assets: Vec<CampaignAsset>) -> Vec<CampaignVariant> {
    assets
        .into_iter()
        .enumerate()
        .map(|(index, asset)| CampaignVariant {
            label: variant_label(index),
            asset,
            metrics: SimulatedMetrics::simulate(),
        })
        .collect()
}

/// Pick the variant with the highest combined score. Ties resolve to the
/// earliest variant.
pub fn recommend(variants: &[CampaignVariant]) -> Option<&CampaignVariant> {
    let mut best: Option<&CampaignVariant> = None;
    for variant in variants {
        match best {
            Some(current)
                if variant.metrics.combined_score() <= current.metrics.combined_score() => {}
            _ => best = Some(variant),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(slogan: &str) -> CampaignAsset {
        CampaignAsset {
            slogan: slogan.into(),
            image_prompt: "a busy city street at dawn".into(),
            color_palette: ColorPalette {
                primary: "#102030".into(),
                secondary: "#405060".into(),
                accent: "#708090".into(),
            },
            font_recommendation: "Inter".into(),
        }
    }

    fn variant(label: &str, ctr: f64, engagement: f64, conversion: f64) -> CampaignVariant {
        CampaignVariant {
            label: label.into(),
            asset: asset(label),
            metrics: SimulatedMetrics {
                ctr,
                engagement,
                conversion,
            },
        }
    }

    #[test]
    fn test_empty_brief_rejected() {
        assert_eq!(CreativeBrief::new(""), Err(BriefError::Empty));
        assert_eq!(CreativeBrief::new("   \n\t"), Err(BriefError::Empty));
    }

    #[test]
    fn test_brief_passthrough() {
        let brief = CreativeBrief::new("Launch promo for a fantasy football app").unwrap();
        assert_eq!(brief.as_str(), "Launch promo for a fantasy football app");
    }

    #[test]
    fn test_variant_labels() {
        assert_eq!(variant_label(0), "A");
        assert_eq!(variant_label(1), "B");
        assert_eq!(variant_label(7), "H");
    }

    #[test]
    fn test_build_variants_labels_in_order() {
        let variants = build_variants(vec![asset("one"), asset("two")]);
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].label, "A");
        assert_eq!(variants[1].label, "B");
        assert_eq!(variants[0].asset.slogan, "one");
    }

    #[test]
    fn test_recommend_highest_score() {
        let variants = vec![
            variant("A", 3.0, 20.0, 2.0),
            variant("B", 8.0, 40.0, 4.5),
            variant("C", 5.0, 30.0, 3.0),
        ];
        assert_eq!(recommend(&variants).unwrap().label, "B");
    }

    #[test]
    fn test_recommend_tie_picks_earliest() {
        let variants = vec![variant("A", 4.0, 20.0, 2.0), variant("B", 4.0, 20.0, 2.0)];
        assert_eq!(recommend(&variants).unwrap().label, "A");
    }

    #[test]
    fn test_recommend_empty() {
        assert!(recommend(&[]).is_none());
    }
}
