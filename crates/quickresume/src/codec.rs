use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose;
use image::GenericImageView;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use resume_form::{CodecError, EncodedImage, ImageCodec};
use tracing::debug;

use crate::config::ImageConfig;

/// Decodes any supported picture, bounds it and re-encodes it as JPEG.
#[derive(Debug, Clone, Copy)]
pub struct JpegCodec {
    max_width: u32,
    max_height: u32,
    quality: u8,
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self::from_config(&ImageConfig::default())
    }
}

impl JpegCodec {
    pub fn from_config(config: &ImageConfig) -> Self {
        Self {
            max_width: config.max_width.max(1),
            max_height: config.max_height.max(1),
            quality: config.quality.clamp(1, 100),
        }
    }

    /// Landscape pictures are bounded by width, everything else by height.
    pub fn target_size(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = |value: u32, numerator: u32, denominator: u32| {
            ((u64::from(value) * u64::from(numerator)) / u64::from(denominator)).max(1) as u32
        };
        if width > height {
            if width > self.max_width {
                return (self.max_width, scale(height, self.max_width, width));
            }
        } else if height > self.max_height {
            return (scale(width, self.max_height, height), self.max_height);
        }
        (width, height)
    }

    fn encode_blocking(self, raw: &[u8]) -> Result<EncodedImage, CodecError> {
        let decoded =
            image::load_from_memory(raw).map_err(|err| CodecError::Decode(err.to_string()))?;
        let (width, height) = decoded.dimensions();
        let (target_w, target_h) = self.target_size(width, height);
        let resized = if (target_w, target_h) == (width, height) {
            decoded
        } else {
            decoded.resize_exact(target_w, target_h, FilterType::Triangle)
        };

        let rgb = resized.to_rgb8();
        let mut jpeg: Vec<u8> = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, self.quality)
            .encode_image(&rgb)
            .map_err(|err| CodecError::Encode(err.to_string()))?;
        debug!(
            width,
            height,
            target_w,
            target_h,
            bytes = jpeg.len(),
            "profile image re-encoded"
        );
        let encoded = general_purpose::STANDARD.encode(jpeg);
        Ok(EncodedImage(format!("data:image/jpeg;base64,{encoded}")))
    }
}

#[async_trait]
impl ImageCodec for JpegCodec {
    async fn encode(&self, raw: Vec<u8>) -> Result<EncodedImage, CodecError> {
        let codec = *self;
        tokio::task::spawn_blocking(move || codec.encode_blocking(&raw))
            .await
            .map_err(|err| CodecError::Task(err.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode png");
        bytes
    }

    #[test]
    fn bounds_follow_orientation() {
        let codec = JpegCodec::default();
        assert_eq!(codec.target_size(800, 600), (400, 300));
        assert_eq!(codec.target_size(600, 800), (300, 400));
        assert_eq!(codec.target_size(500, 500), (400, 400));
        assert_eq!(codec.target_size(120, 80), (120, 80));
    }

    #[tokio::test]
    async fn encodes_png_to_bounded_jpeg_data_url() {
        let codec = JpegCodec::default();
        let encoded = codec.encode(png(800, 200)).await.expect("encode");
        let payload = encoded
            .as_str()
            .strip_prefix("data:image/jpeg;base64,")
            .expect("jpeg data url");
        let jpeg = general_purpose::STANDARD.decode(payload).expect("base64");
        let decoded = image::load_from_memory(&jpeg).expect("decode jpeg");
        assert_eq!(decoded.dimensions(), (400, 100));
    }

    #[tokio::test]
    async fn garbage_is_a_decode_error() {
        let err = JpegCodec::default()
            .encode(b"definitely not an image".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }
}
