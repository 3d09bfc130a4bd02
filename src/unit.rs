// src/unit.rs
use std::sync::Arc;

use crate::encoder::{DEFAULT_ENCODER, ImageEncoder};
use crate::error::EncodingError;
use crate::payload::ControlNetUnitPayload;
use crate::unit_config::{ControlNetUnitConfig, defaults};

/// One ControlNet unit of a generation request.
///
/// Holds the caller's configuration unchanged and resolves it into a
/// [`ControlNetUnitPayload`] on demand. Nothing is cached between calls.
///
/// ```no_run
/// # async fn run() -> Result<(), controlnet_unit::EncodingError> {
/// use controlnet_unit::{ControlNetUnit, ControlNetUnitConfig};
///
/// let png = std::fs::read("depth.png").unwrap();
/// let unit = ControlNetUnit::new(
///     ControlNetUnitConfig::new(png).module("depth").model("depth"),
/// );
/// let json = unit.to_json().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ControlNetUnit {
    config: ControlNetUnitConfig,
    encoder: Arc<dyn ImageEncoder>,
}

impl ControlNetUnit {
    pub fn new(config: ControlNetUnitConfig) -> Self {
        Self::with_encoder(config, Arc::clone(&*DEFAULT_ENCODER))
    }

    pub fn with_encoder(config: ControlNetUnitConfig, encoder: Arc<dyn ImageEncoder>) -> Self {
        Self { config, encoder }
    }

    pub fn config(&self) -> &ControlNetUnitConfig {
        &self.config
    }

    /// Encodes the image (and mask, if any) and fills omitted fields with defaults.
    pub async fn to_payload(&self) -> Result<ControlNetUnitPayload, EncodingError> {
        let config = &self.config;
        let params = &config.params;

        tracing::debug!(has_mask = config.mask.is_some(), "encoding ControlNet unit images");

        let mask = async {
            match &config.mask {
                Some(mask) => self.encoder.encode_base64(mask).await.map(Some),
                None => Ok(None),
            }
        };
        let (input_image, mask) =
            tokio::try_join!(self.encoder.encode_base64(&config.input_image), mask)?;

        let payload = ControlNetUnitPayload {
            input_image,
            mask,
            module: params
                .module
                .clone()
                .unwrap_or_else(|| defaults::MODULE.to_string()),
            model: params
                .model
                .clone()
                .unwrap_or_else(|| defaults::MODEL.to_string()),
            weight: params.weight.unwrap_or(defaults::WEIGHT),
            resize_mode: params.resize_mode.unwrap_or(defaults::RESIZE_MODE),
            lowvram: params.lowvram.unwrap_or(defaults::LOWVRAM),
            processor_res: params.processor_res.unwrap_or(defaults::PROCESSOR_RES),
            threshold_a: params.threshold_a.unwrap_or(defaults::THRESHOLD_A),
            threshold_b: params.threshold_b.unwrap_or(defaults::THRESHOLD_B),
            guidance: params.guidance.unwrap_or(defaults::GUIDANCE),
            guidance_start: params.guidance_start.unwrap_or(defaults::GUIDANCE_START),
            guidance_end: params.guidance_end.unwrap_or(defaults::GUIDANCE_END),
            control_mode: params.control_mode.unwrap_or(defaults::CONTROL_MODE),
        };

        tracing::debug!(
            module = %payload.module,
            model = %payload.model,
            "ControlNet unit payload assembled"
        );

        Ok(payload)
    }

    /// Same as [`to_payload`](Self::to_payload), as a JSON object.
    pub async fn to_json(&self) -> Result<serde_json::Value, EncodingError> {
        let payload = self.to_payload().await?;
        Ok(serde_json::to_value(payload)?)
    }
}

impl std::fmt::Debug for ControlNetUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlNetUnit")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
