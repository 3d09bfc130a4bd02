// src/encoder.rs
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as Base64;
use image::{DynamicImage, ImageFormat};
use once_cell::sync::Lazy;
use std::io::Cursor;
use std::sync::Arc;

use crate::error::EncodingError;

/// An in-memory image accepted by an [`ImageEncoder`].
///
/// Cloning is cheap; both variants share their buffer.
#[derive(Clone)]
pub enum ImageHandle {
    /// Bytes of an encoded image file (PNG, JPEG, ...).
    Encoded(Arc<[u8]>),
    /// A decoded raster.
    Decoded(Arc<DynamicImage>),
}

impl std::fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageHandle::Encoded(bytes) => write!(f, "Encoded({} bytes)", bytes.len()),
            ImageHandle::Decoded(raster) => {
                write!(f, "Decoded({}x{})", raster.width(), raster.height())
            }
        }
    }
}

impl From<Vec<u8>> for ImageHandle {
    fn from(bytes: Vec<u8>) -> Self {
        ImageHandle::Encoded(bytes.into())
    }
}

impl From<&[u8]> for ImageHandle {
    fn from(bytes: &[u8]) -> Self {
        ImageHandle::Encoded(bytes.into())
    }
}

impl From<DynamicImage> for ImageHandle {
    fn from(image: DynamicImage) -> Self {
        ImageHandle::Decoded(Arc::new(image))
    }
}

/// Turns an image handle into base64 text.
#[async_trait]
pub trait ImageEncoder: Send + Sync {
    async fn encode_base64(&self, image: &ImageHandle) -> Result<String, EncodingError>;
}

/// Default encoder.
///
/// File bytes are verified by decoding them and then passed through unchanged;
/// rasters are written as PNG. The output uses the standard padded alphabet.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngBase64Encoder;

impl PngBase64Encoder {
    /// Synchronous core of [`ImageEncoder::encode_base64`].
    pub fn encode_blocking(image: &ImageHandle) -> Result<String, EncodingError> {
        match image {
            ImageHandle::Encoded(bytes) => {
                image::load_from_memory(&bytes[..])?;
                Ok(Base64.encode(&bytes[..]))
            }
            ImageHandle::Decoded(raster) => {
                let mut png = Cursor::new(Vec::new());
                raster.write_to(&mut png, ImageFormat::Png)?;
                Ok(Base64.encode(png.into_inner()))
            }
        }
    }
}

#[async_trait]
impl ImageEncoder for PngBase64Encoder {
    async fn encode_base64(&self, image: &ImageHandle) -> Result<String, EncodingError> {
        let image = image.clone();
        // Decoding and PNG compression are CPU-bound.
        tokio::task::spawn_blocking(move || Self::encode_blocking(&image)).await?
    }
}

pub static DEFAULT_ENCODER: Lazy<Arc<dyn ImageEncoder>> =
    Lazy::new(|| Arc::new(PngBase64Encoder) as Arc<dyn ImageEncoder>);
