//! External image generation
//!
//! The service turns a user photo and a bag colour into a finished image.

mod client;
mod error;

pub use client::{FlowClient, FlowConfig};
pub use error::{GenerationError, GenerationErrorKind};

use crate::runtime::ImageGenerator;
use crate::state_machine::{BagColor, UserId};
use async_trait::async_trait;

/// Logging wrapper for image generators
pub struct LoggingGenerator<G> {
    inner: G,
}

impl<G: ImageGenerator> LoggingGenerator<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<G: ImageGenerator> ImageGenerator for LoggingGenerator<G> {
    async fn generate(&self, image: Vec<u8>, choice: BagColor, user_id: UserId) -> Result<Vec<u8>, GenerationError> {
        let input_bytes = image.len();
        let start = std::time::Instant::now();
        let result = self.inner.generate(image, choice, user_id).await;
        let duration = start.elapsed();

        match &result {
            Ok(output) => {
                tracing::info!(
                    user_id = %user_id,
                    choice = %choice,
                    duration_ms = %duration.as_millis(),
                    input_bytes,
                    output_bytes = output.len(),
                    "Generation completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    user_id = %user_id,
                    choice = %choice,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Generation failed"
                );
            }
        }

        result
    }
}
