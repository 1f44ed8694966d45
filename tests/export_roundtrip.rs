//! End-to-end export checks: the JSON document round-trips through disk and
//! the image archive carries one entry per variant.

use std::collections::HashMap;
use std::fs;
use std::io::Read;

use adstudio::campaign::{CampaignAsset, ColorPalette, CreativeBrief, build_variants};
use adstudio::export::{CAMPAIGN_FILE, CampaignExport, write_image_archive};

fn sample_asset(slogan: &str) -> CampaignAsset {
    CampaignAsset {
        slogan: slogan.into(),
        image_prompt: "sunlit rooftop party, wide shot".into(),
        color_palette: ColorPalette {
            primary: "#0A84FF".into(),
            secondary: "#1C1C1E".into(),
            accent: "#FF375F".into(),
        },
        font_recommendation: "Poppins".into(),
    }
}

#[test]
fn exported_campaign_roundtrips_from_disk() {
    let dir = tempfile::tempdir().unwrap();

    let brief = CreativeBrief::new("Rooftop summer series for a seltzer brand").unwrap();
    let variants = build_variants(vec![sample_asset("Sip the Skyline"), sample_asset("Golden Hour, Bottled")]);
    let export = CampaignExport::new(&brief, &variants);

    let path = export.write_to(dir.path()).unwrap();
    assert!(path.ends_with(CAMPAIGN_FILE));

    let raw = fs::read_to_string(&path).unwrap();
    let parsed = CampaignExport::parse(&raw).unwrap();

    assert_eq!(parsed, export);
    assert_eq!(parsed.creative_brief, brief.as_str());
    assert_eq!(parsed.variants, variants);
}

#[test]
fn image_archive_contains_one_entry_per_variant() {
    let dir = tempfile::tempdir().unwrap();

    let mut images: HashMap<String, Vec<u8>> = HashMap::new();
    images.insert("A".into(), vec![1, 2, 3]);
    images.insert("B".into(), vec![4, 5]);

    let path = write_image_archive(dir.path(), &images).unwrap();

    let file = fs::File::open(&path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    assert_eq!(archive.len(), 2);

    let mut bytes = Vec::new();
    archive
        .by_name("variant_A_image.png")
        .unwrap()
        .read_to_end(&mut bytes)
        .unwrap();
    assert_eq!(bytes, vec![1, 2, 3]);

    assert!(archive.by_name("variant_B_image.png").is_ok());
}
