//! Gemini text-generation client.
//!
//! One `generateContent` request per brief, asking for N campaign variants
//! as a JSON array. The response is parsed with the usual hardening for
//! LLM output: strip code fences, fall back to the first balanced JSON
//! block, then deserialize into typed records. No retry, no repair; a
//! response that does not parse is surfaced as a generation failure.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{GenerationError, GOOGLE_API_BASE, extract_json_block, strip_code_fences};
use crate::campaign::{CampaignAsset, CreativeBrief, MAX_VARIANTS};

/// Default text model.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";

/// Creative approaches cycled across variants, in label order.
const APPROACHES: [&str; MAX_VARIANTS] = [
    "bold and direct",
    "creative and artistic",
    "minimal and refined",
    "playful and energetic",
    "premium and understated",
    "nostalgic and warm",
    "futuristic and sleek",
    "grassroots and authentic",
];

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct TextPart {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt_token_count: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidates_token_count: Option<u32>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

// ============================================================================
// Client
// ============================================================================

/// Gemini `generateContent` client.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a client with the default model.
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_TEXT_MODEL.to_string())
    }

    /// Create a client with a custom model.
    pub fn with_model(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Ask the model for `count` campaign variants for `brief`.
    ///
    /// Exactly one API call; upstream failures propagate as
    /// [`GenerationError::Api`] and unparseable output as
    /// [`GenerationError::Malformed`].
    pub async fn generate_variants(
        &self,
        brief: &CreativeBrief,
        count: usize,
    ) -> Result<Vec<CampaignAsset>, GenerationError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![TextPart {
                    text: build_prompt(brief.as_str(), count),
                }],
            }],
            system_instruction: Some(SystemInstruction {
                parts: vec![TextPart {
                    text: "You are a creative marketing assistant.".to_string(),
                }],
            }),
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            GOOGLE_API_BASE, self.model, self.api_key
        );

        debug!(model = %self.model, count, "requesting campaign variants");

        let response = self.http.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let data: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::malformed(format!("JSON parse error: {}", e), &body))?;

        if let Some(error) = data.error {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body: error.message,
            });
        }

        if let Some(usage) = data.usage_metadata {
            info!(
                model = %self.model,
                prompt_tokens = usage.prompt_token_count.unwrap_or(0),
                candidate_tokens = usage.candidates_token_count.unwrap_or(0),
                "gemini usage"
            );
        }

        let text = data
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GenerationError::malformed("no text in response", &body));
        }

        parse_variants(&text, count)
    }
}

/// Build the prompt asking for `count` distinct variants as a JSON array.
pub fn build_prompt(brief: &str, count: usize) -> String {
    let approaches = (0..count)
        .map(|i| {
            format!(
                "- Variant {}: {} approach",
                crate::campaign::variant_label(i),
                APPROACHES[i % APPROACHES.len()]
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r##"Based on the following creative brief, generate {count} distinct campaign variants, each with a different creative approach.

Creative Brief: {brief}

For each variant, provide:
1. A unique campaign slogan
2. A detailed image generation prompt (describe visual style, colors, mood, elements)
3. A color palette with 3 hex colors (primary, secondary, accent)
4. A font recommendation

Make each variant distinctly different in tone and approach:
{approaches}

Return ONLY a JSON array with exactly {count} entries, in variant order:
[
  {{
    "slogan": "campaign slogan here",
    "image_prompt": "detailed image description here",
    "color_palette": {{
      "primary": "#hexcode",
      "secondary": "#hexcode",
      "accent": "#hexcode"
    }},
    "font_recommendation": "font name"
  }}
]"##
    )
}

/// Parse the model's reply into exactly `expected` assets.
pub fn parse_variants(text: &str, expected: usize) -> Result<Vec<CampaignAsset>, GenerationError> {
    let stripped = strip_code_fences(text);

    let assets: Vec<CampaignAsset> = match serde_json::from_str(stripped) {
        Ok(assets) => assets,
        Err(_) => {
            let block = extract_json_block(stripped)
                .ok_or_else(|| GenerationError::malformed("no JSON array in response", text))?;
            serde_json::from_str(block).map_err(|e| {
                GenerationError::malformed(format!("variant JSON did not parse: {}", e), text)
            })?
        }
    };

    if assets.len() != expected {
        return Err(GenerationError::malformed(
            format!("expected {} variants, got {}", expected, assets.len()),
            text,
        ));
    }

    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_variants_json() -> String {
        r##"[
          {
            "slogan": "Draft Different",
            "image_prompt": "neon stadium, confetti, high energy",
            "color_palette": {"primary": "#FF3B30", "secondary": "#1C1C1E", "accent": "#FFD60A"},
            "font_recommendation": "Montserrat"
          },
          {
            "slogan": "Your League, Your Legend",
            "image_prompt": "painterly collage of trophies and memes",
            "color_palette": {"primary": "#5856D6", "secondary": "#F2F2F7", "accent": "#34C759"},
            "font_recommendation": "Playfair Display"
          }
        ]"##
        .to_string()
    }

    #[test]
    fn test_parse_two_wellformed_variants() {
        let assets = parse_variants(&two_variants_json(), 2).unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].slogan, "Draft Different");
        assert_eq!(assets[1].color_palette.accent, "#34C759");
    }

    #[test]
    fn test_parse_fenced_response() {
        let fenced = format!("```json\n{}\n```", two_variants_json());
        let assets = parse_variants(&fenced, 2).unwrap();
        assert_eq!(assets.len(), 2);
    }

    #[test]
    fn test_parse_with_surrounding_prose() {
        let chatty = format!("Here are your variants:\n{}\nLet me know!", two_variants_json());
        let assets = parse_variants(&chatty, 2).unwrap();
        assert_eq!(assets[1].font_recommendation, "Playfair Display");
    }

    #[test]
    fn test_parse_count_mismatch_is_malformed() {
        let err = parse_variants(&two_variants_json(), 3).unwrap_err();
        assert!(matches!(err, GenerationError::Malformed { .. }));
        assert!(err.to_string().contains("expected 3 variants, got 2"));
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        let err = parse_variants("the model had a bad day", 2).unwrap_err();
        assert!(matches!(err, GenerationError::Malformed { .. }));
    }

    #[test]
    fn test_prompt_mentions_brief_and_count() {
        let prompt = build_prompt("Sneaker drop for skaters", 2);
        assert!(prompt.contains("Sneaker drop for skaters"));
        assert!(prompt.contains("2 distinct campaign variants"));
        assert!(prompt.contains("Variant A: bold and direct"));
        assert!(prompt.contains("Variant B: creative and artistic"));
    }

    #[test]
    fn test_default_model() {
        let client = GeminiClient::new("test-key".to_string());
        assert_eq!(client.model_name(), DEFAULT_TEXT_MODEL);
    }
}
