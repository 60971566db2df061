use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::repository::ResumeRepository;
use crate::store::{KeyValueStore, StoreError};

/// Encoded picture, stored as a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(pub String);

impl EncodedImage {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("image could not be decoded: {0}")]
    Decode(String),
    #[error("image could not be encoded: {0}")]
    Encode(String),
    #[error("image task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("no image data supplied")]
    NoFile,
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("encoded image does not fit in storage")]
    TooLarge(#[source] StoreError),
}

impl ImageError {
    /// Message catalog key shown to the user.
    pub fn message_key(&self) -> &'static str {
        match self {
            ImageError::NoFile => "image.no_file",
            ImageError::Codec(_) => "image.process_failed",
            ImageError::TooLarge(_) => "image.too_large",
        }
    }
}

/// Reads raw picture bytes, bounds their dimensions and encodes them.
#[async_trait]
pub trait ImageCodec: Send + Sync {
    async fn encode(&self, raw: Vec<u8>) -> Result<EncodedImage, CodecError>;
}

/// Encode then persist, with one outcome for the whole chain.
#[derive(Debug, Clone)]
pub struct ProfileImagePipeline<C> {
    codec: C,
}

impl<C: ImageCodec> ProfileImagePipeline<C> {
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Résumé data is never touched here. When the encoded picture cannot be
    /// stored, any previously stored picture is dropped as well.
    pub async fn process<S: KeyValueStore>(
        &self,
        raw: Vec<u8>,
        repository: &mut ResumeRepository<S>,
    ) -> Result<EncodedImage, ImageError> {
        if raw.is_empty() {
            return Err(ImageError::NoFile);
        }
        let input_bytes = raw.len();
        let encoded = self.codec.encode(raw).await?;
        debug!(
            input_bytes,
            encoded_len = encoded.as_str().len(),
            "profile image encoded"
        );
        if let Err(err) = repository.save_profile_image(encoded.as_str()) {
            if let Err(remove_err) = repository.remove_profile_image() {
                warn!(error = %remove_err, "could not drop stale profile image");
            }
            return Err(ImageError::TooLarge(err));
        }
        Ok(encoded)
    }
}
