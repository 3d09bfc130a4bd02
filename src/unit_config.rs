// src/unit_config.rs
use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::encoder::ImageHandle;
use crate::error::PresetError;

/// Values substituted for tuning parameters the caller left out.
pub mod defaults {
    use super::{ControlMode, ResizeMode};

    pub const MODULE: &str = "none";
    pub const MODEL: &str = "None";
    pub const WEIGHT: f64 = 1.0;
    pub const RESIZE_MODE: ResizeMode = ResizeMode::ScaleToFitInnerFit;
    pub const LOWVRAM: bool = false;
    pub const PROCESSOR_RES: f64 = 64.0;
    pub const THRESHOLD_A: f64 = 64.0;
    pub const THRESHOLD_B: f64 = 64.0;
    pub const GUIDANCE: f64 = 1.0;
    pub const GUIDANCE_START: f64 = 0.0;
    pub const GUIDANCE_END: f64 = 1.0;
    pub const CONTROL_MODE: ControlMode = ControlMode::Balanced;
}

/// How the control image is fitted to the generation resolution.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeMode {
    #[serde(rename = "Just Resize")]
    JustResize,
    #[default]
    #[serde(rename = "Scale to Fit (Inner Fit)")]
    ScaleToFitInnerFit,
    #[serde(rename = "Envelope (Outer Fit)")]
    EnvelopeOuterFit,
}

/// Balance between the text prompt and the control image.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlMode {
    #[default]
    Balanced,
    #[serde(rename = "My prompt is more important")]
    PromptMoreImportant,
    #[serde(rename = "ControlNet is more important")]
    ControlNetMoreImportant,
}

/// Optional tuning parameters of a ControlNet unit.
///
/// Every field may be absent; absence (and only absence) selects the value in
/// [`defaults`]. Presets can be loaded from JSON with the same field names the
/// ControlNet API uses.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UnitParams {
    pub module: Option<String>,
    pub model: Option<String>,
    pub weight: Option<f64>,
    pub resize_mode: Option<ResizeMode>,
    pub lowvram: Option<bool>,
    pub processor_res: Option<f64>,
    pub threshold_a: Option<f64>,
    pub threshold_b: Option<f64>,
    pub guidance: Option<f64>,
    pub guidance_start: Option<f64>,
    pub guidance_end: Option<f64>,
    pub control_mode: Option<ControlMode>,
}

impl UnitParams {
    pub fn from_json_str(json: &str) -> Result<Self, PresetError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PresetError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Caller-supplied configuration of one ControlNet unit.
#[derive(Debug, Clone)]
pub struct ControlNetUnitConfig {
    pub input_image: ImageHandle,
    pub mask: Option<ImageHandle>,
    pub params: UnitParams,
}

impl ControlNetUnitConfig {
    pub fn new(input_image: impl Into<ImageHandle>) -> Self {
        Self {
            input_image: input_image.into(),
            mask: None,
            params: UnitParams::default(),
        }
    }

    /// Replaces all tuning parameters, e.g. with a preset loaded from disk.
    pub fn with_params(mut self, params: UnitParams) -> Self {
        self.params = params;
        self
    }

    pub fn mask(mut self, mask: impl Into<ImageHandle>) -> Self {
        self.mask = Some(mask.into());
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.params.module = Some(module.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.params.model = Some(model.into());
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.params.weight = Some(weight);
        self
    }

    pub fn resize_mode(mut self, resize_mode: ResizeMode) -> Self {
        self.params.resize_mode = Some(resize_mode);
        self
    }

    pub fn lowvram(mut self, lowvram: bool) -> Self {
        self.params.lowvram = Some(lowvram);
        self
    }

    pub fn processor_res(mut self, processor_res: f64) -> Self {
        self.params.processor_res = Some(processor_res);
        self
    }

    pub fn threshold_a(mut self, threshold_a: f64) -> Self {
        self.params.threshold_a = Some(threshold_a);
        self
    }

    pub fn threshold_b(mut self, threshold_b: f64) -> Self {
        self.params.threshold_b = Some(threshold_b);
        self
    }

    pub fn guidance(mut self, guidance: f64) -> Self {
        self.params.guidance = Some(guidance);
        self
    }

    pub fn guidance_start(mut self, guidance_start: f64) -> Self {
        self.params.guidance_start = Some(guidance_start);
        self
    }

    pub fn guidance_end(mut self, guidance_end: f64) -> Self {
        self.params.guidance_end = Some(guidance_end);
        self
    }

    pub fn control_mode(mut self, control_mode: ControlMode) -> Self {
        self.params.control_mode = Some(control_mode);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_defaults_match_default_table() {
        assert_eq!(ResizeMode::default(), defaults::RESIZE_MODE);
        assert_eq!(ControlMode::default(), defaults::CONTROL_MODE);
    }

    #[test]
    fn enums_serialize_to_api_strings() {
        assert_eq!(
            serde_json::to_string(&ResizeMode::ScaleToFitInnerFit).unwrap(),
            "\"Scale to Fit (Inner Fit)\""
        );
        assert_eq!(
            serde_json::to_string(&ResizeMode::EnvelopeOuterFit).unwrap(),
            "\"Envelope (Outer Fit)\""
        );
        assert_eq!(
            serde_json::to_string(&ControlMode::PromptMoreImportant).unwrap(),
            "\"My prompt is more important\""
        );
        assert_eq!(
            serde_json::to_string(&ControlMode::Balanced).unwrap(),
            "\"Balanced\""
        );
    }

    #[test]
    fn preset_loads_partial_fields() {
        let params = UnitParams::from_json_str(
            r#"{ "module": "canny", "weight": 0, "lowvram": false, "control_mode": "ControlNet is more important" }"#,
        )
        .unwrap();

        assert_eq!(params.module.as_deref(), Some("canny"));
        assert_eq!(params.weight, Some(0.0));
        assert_eq!(params.lowvram, Some(false));
        assert_eq!(params.control_mode, Some(ControlMode::ControlNetMoreImportant));
        assert_eq!(params.model, None);
        assert_eq!(params.threshold_a, None);
    }

    #[test]
    fn preset_rejects_unknown_fields() {
        let err = UnitParams::from_json_str(r#"{ "wieght": 0.5 }"#).unwrap_err();
        assert!(matches!(err, PresetError::Config(_)));
    }

    #[test]
    fn preset_rejects_unknown_control_mode() {
        assert!(UnitParams::from_json_str(r#"{ "control_mode": "Loud" }"#).is_err());
    }

    #[test]
    fn preset_from_reader() {
        let json = br#"{ "processor_res": 512, "threshold_a": 100.5 }"#;
        let params = UnitParams::from_reader(&json[..]).unwrap();
        assert_eq!(params.processor_res, Some(512.0));
        assert_eq!(params.threshold_a, Some(100.5));
    }

    #[test]
    fn preset_keeps_out_of_range_processor_res() {
        let negative = UnitParams::from_json_str(r#"{ "processor_res": -1 }"#).unwrap();
        assert_eq!(negative.processor_res, Some(-1.0));

        let fractional = UnitParams::from_json_str(r#"{ "processor_res": 512.0 }"#).unwrap();
        assert_eq!(fractional.processor_res, Some(512.0));

        let odd = UnitParams::from_json_str(r#"{ "processor_res": 383.5 }"#).unwrap();
        assert_eq!(odd.processor_res, Some(383.5));
    }

    #[test]
    fn setters_fill_params() {
        let config = ControlNetUnitConfig::new(vec![1u8, 2, 3])
            .module("depth")
            .model("control_depth")
            .weight(0.0)
            .lowvram(true)
            .guidance_start(0.2)
            .guidance_end(0.8);

        assert!(config.mask.is_none());
        assert_eq!(config.params.module.as_deref(), Some("depth"));
        assert_eq!(config.params.model.as_deref(), Some("control_depth"));
        assert_eq!(config.params.weight, Some(0.0));
        assert_eq!(config.params.lowvram, Some(true));
        assert_eq!(config.params.guidance_start, Some(0.2));
        assert_eq!(config.params.guidance_end, Some(0.8));
        assert_eq!(config.params.resize_mode, None);
    }

    #[test]
    fn with_params_replaces_previous_settings() {
        let preset = UnitParams {
            model: Some("openpose".to_string()),
            ..UnitParams::default()
        };
        let config = ControlNetUnitConfig::new(vec![0u8])
            .module("depth")
            .with_params(preset.clone());

        assert_eq!(config.params, preset);
    }
}
