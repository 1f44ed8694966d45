//! Imagen image-generation client behind the `ImageModel` seam.
//!
//! One `:predict` call per variant image. The only retry policy in the
//! whole pipeline lives here: if the primary model fails, the fallback
//! model is attempted exactly once before the failure is reported.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{GenerationError, GOOGLE_API_BASE};

/// Default primary image model.
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-preview-06-06";
/// Default fallback image model, tried once when the primary fails.
pub const DEFAULT_FALLBACK_MODEL: &str = "imagen-3.0-generate-002";

/// Campaign visuals are generated wide.
const ASPECT_RATIO: &str = "16:9";
const SAFETY_FILTER_LEVEL: &str = "block_low_and_above";
const PERSON_GENERATION: &str = "allow_adult";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A hosted image model that turns a prompt into encoded image bytes.
#[async_trait]
pub trait ImageModel: Send + Sync {
    fn model_id(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, GenerationError>;
}

/// Vertex AI routing: with a project configured, predict calls go to the
/// regional Vertex endpoint instead of the Generative Language API.
#[derive(Debug, Clone)]
pub struct VertexTarget {
    pub project_id: String,
    pub location: String,
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
struct PredictRequest {
    instances: Vec<Instance>,
    parameters: Parameters,
}

#[derive(Serialize)]
struct Instance {
    prompt: String,
}

#[derive(Serialize)]
struct Parameters {
    #[serde(rename = "sampleCount")]
    sample_count: u32,
    #[serde(rename = "aspectRatio")]
    aspect_ratio: String,
    #[serde(rename = "safetyFilterLevel")]
    safety_filter_level: String,
    #[serde(rename = "personGeneration")]
    person_generation: String,
}

#[derive(Deserialize)]
struct PredictResponse {
    predictions: Option<Vec<Prediction>>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Prediction {
    #[serde(rename = "bytesBase64Encoded")]
    bytes_base64_encoded: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

// ============================================================================
// Client
// ============================================================================

/// Imagen `:predict` client for one model id.
pub struct ImagenClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    vertex: Option<VertexTarget>,
}

impl ImagenClient {
    pub fn new(
        api_key: String,
        model: String,
        vertex: Option<VertexTarget>,
    ) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_key,
            model,
            vertex,
        })
    }

    fn endpoint(&self) -> String {
        match &self.vertex {
            Some(v) => format!(
                "https://{loc}-aiplatform.googleapis.com/v1/projects/{proj}/locations/{loc}/publishers/google/models/{model}:predict",
                loc = v.location,
                proj = v.project_id,
                model = self.model,
            ),
            None => format!("{}/{}:predict", GOOGLE_API_BASE, self.model),
        }
    }
}

#[async_trait]
impl ImageModel for ImagenClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, GenerationError> {
        let request = PredictRequest {
            instances: vec![Instance {
                prompt: prompt.to_string(),
            }],
            parameters: Parameters {
                sample_count: 1,
                aspect_ratio: ASPECT_RATIO.to_string(),
                safety_filter_level: SAFETY_FILTER_LEVEL.to_string(),
                person_generation: PERSON_GENERATION.to_string(),
            },
        };

        debug!(model = %self.model, "requesting image generation");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let data: PredictResponse = response.json().await?;

        if let Some(error) = data.error {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body: error.message,
            });
        }

        let encoded = data
            .predictions
            .and_then(|p| p.into_iter().next())
            .and_then(|p| p.bytes_base64_encoded)
            .ok_or_else(|| GenerationError::malformed("no images were generated", ""))?;

        BASE64
            .decode(&encoded)
            .map_err(|e| GenerationError::malformed(format!("image bytes did not decode: {}", e), &encoded))
    }
}

/// Try the primary model once; on failure, try the fallback exactly once.
pub async fn generate_with_fallback(
    primary: &dyn ImageModel,
    fallback: &dyn ImageModel,
    prompt: &str,
) -> Result<Vec<u8>, GenerationError> {
    match primary.generate(prompt).await {
        Ok(bytes) => Ok(bytes),
        Err(primary_err) => {
            warn!(
                model = primary.model_id(),
                error = %primary_err,
                "primary image model failed, trying fallback"
            );
            fallback
                .generate(prompt)
                .await
                .map_err(|fallback_err| GenerationError::FallbackExhausted {
                    primary: primary.model_id().to_string(),
                    fallback: fallback.model_id().to_string(),
                    source: Box::new(fallback_err),
                })
        }
    }
}
