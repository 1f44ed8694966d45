//! In-memory session state.
//!
//! Everything lives for one interactive session and is discarded on exit;
//! there is no persistence layer.

use std::collections::HashMap;

use crate::campaign::{CampaignVariant, CreativeBrief};
use crate::metrics::SimulatedMetrics;

/// The current campaign: brief, variants, and any generated image bytes
/// keyed by variant label.
#[derive(Default)]
pub struct Session {
    brief: Option<CreativeBrief>,
    variants: Vec<CampaignVariant>,
    images: HashMap<String, Vec<u8>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly generated campaign. Images from a previous
    /// generation no longer match their variants and are dropped.
    pub fn set_campaign(&mut self, brief: CreativeBrief, variants: Vec<CampaignVariant>) {
        self.brief = Some(brief);
        self.variants = variants;
        self.images.clear();
    }

    pub fn has_campaign(&self) -> bool {
        !self.variants.is_empty()
    }

    pub fn brief(&self) -> Option<&CreativeBrief> {
        self.brief.as_ref()
    }

    pub fn variants(&self) -> &[CampaignVariant] {
        &self.variants
    }

    /// Look up a variant by label, case-insensitively.
    pub fn variant(&self, label: &str) -> Option<&CampaignVariant> {
        self.variants
            .iter()
            .find(|v| v.label.eq_ignore_ascii_case(label))
    }

    pub fn store_image(&mut self, label: &str, bytes: Vec<u8>) {
        self.images.insert(label.to_string(), bytes);
    }

    pub fn image(&self, label: &str) -> Option<&[u8]> {
        self.images.get(label).map(Vec::as_slice)
    }

    pub fn images(&self) -> &HashMap<String, Vec<u8>> {
        &self.images
    }

    /// Re-roll the simulated metrics for every variant.
    pub fn reroll_metrics(&mut self) {
        for variant in &mut self.variants {
            variant.metrics = SimulatedMetrics::simulate();
        }
    }

    pub fn clear(&mut self) {
        self.brief = None;
        self.variants.clear();
        self.images.clear();
    }
}
