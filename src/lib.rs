//! Normalizes ControlNet unit settings into the payload expected by the
//! sd-webui ControlNet extension API.
//!
//! A [`ControlNetUnit`] wraps a [`ControlNetUnitConfig`]; calling
//! [`ControlNetUnit::to_payload`] base64-encodes the control image (and mask)
//! and fills every omitted tuning parameter with its default.

pub mod encoder;
pub mod error;
pub mod payload;
pub mod unit;
pub mod unit_config;

pub use encoder::{DEFAULT_ENCODER, ImageEncoder, ImageHandle, PngBase64Encoder};
pub use error::{EncodingError, PresetError};
pub use payload::ControlNetUnitPayload;
pub use unit::ControlNetUnit;
pub use unit_config::{ControlMode, ControlNetUnitConfig, ResizeMode, UnitParams, defaults};
