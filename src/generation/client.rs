//! HTTP client for the external generation flow
//!
//! One multipart POST per turn. The response is either the image itself or a
//! JSON body pointing at it, in which case exactly one follow-up GET is made.

use super::GenerationError;
use crate::runtime::ImageGenerator;
use crate::state_machine::{BagColor, UserId};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

const INPUT_FILE_NAME: &str = "user_photo.jpg";
const INPUT_MIME: &str = "image/jpeg";
/// Characters of an error body kept for logging
const ERROR_BODY_PREVIEW: usize = 200;

/// Connection settings for the generation service
#[derive(Debug, Clone)]
pub struct FlowConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

/// Generation service client
pub struct FlowClient {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl FlowClient {
    pub fn new(config: &FlowConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| GenerationError::from_reqwest("building HTTP client", e))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    fn build_form(image: Vec<u8>, choice: BagColor, user_id: UserId) -> Result<Form, GenerationError> {
        let part = Part::bytes(image)
            .file_name(INPUT_FILE_NAME)
            .mime_str(INPUT_MIME)
            .map_err(|e| GenerationError::from_reqwest("building multipart body", e))?;

        Ok(Form::new()
            .part("image", part)
            .text("color", choice.as_str())
            .text("user_id", user_id.to_string()))
    }

    /// Follow an `image_url` reference from a JSON response
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, GenerationError> {
        tracing::debug!("Fetching generated image from reference");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GenerationError::from_reqwest("image fetch", e))?;
        let response = ensure_success(response).await?;
        read_bytes(response).await
    }
}

#[async_trait]
impl ImageGenerator for FlowClient {
    async fn generate(&self, image: Vec<u8>, choice: BagColor, user_id: UserId) -> Result<Vec<u8>, GenerationError> {
        let form = Self::build_form(image, choice, user_id)?;

        let mut request = self.client.post(&self.url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GenerationError::from_reqwest("generation request", e))?;
        let response = ensure_success(response).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.contains("image") {
            return read_bytes(response).await;
        }

        if content_type.contains("application/json") {
            let body = read_bytes(response).await?;
            let parsed: FlowResponse = serde_json::from_slice(&body)
                .map_err(|e| GenerationError::decode(format!("Failed to parse JSON response: {e}")))?;
            if let Some(url) = parsed.image_url.filter(|u| !u.is_empty()) {
                return self.fetch_image(&url).await;
            }
        }

        Err(GenerationError::unexpected_content(&content_type))
    }
}

async fn ensure_success(response: Response) -> Result<Response, GenerationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
    Err(GenerationError::status(status.as_u16(), &preview))
}

async fn read_bytes(response: Response) -> Result<Vec<u8>, GenerationError> {
    response
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| GenerationError::from_reqwest("reading response body", e))
}

#[derive(Debug, Deserialize)]
struct FlowResponse {
    #[serde(default)]
    image_url: Option<String>,
}
