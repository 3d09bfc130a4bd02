// src/payload.rs
use serde::{Deserialize, Serialize};

use crate::unit_config::{ControlMode, ResizeMode};

/// Fully resolved ControlNet unit, ready to be placed in a generation request.
///
/// `mask` is left out of the serialized object when the unit has none.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ControlNetUnitPayload {
    pub input_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    pub module: String,
    pub model: String,
    pub weight: f64,
    pub resize_mode: ResizeMode,
    pub lowvram: bool,
    pub processor_res: f64,
    pub threshold_a: f64,
    pub threshold_b: f64,
    pub guidance: f64,
    pub guidance_start: f64,
    pub guidance_end: f64,
    pub control_mode: ControlMode,
}
