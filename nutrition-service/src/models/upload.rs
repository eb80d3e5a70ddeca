use crate::error::ImageProcessingError;
use image::DynamicImage;

/// An image file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub data: Vec<u8>,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl UploadedImage {
    pub fn new(data: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            data,
            content_type: content_type.into(),
            file_name: None,
        }
    }

    /// Whether the declared content type is an image type.
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Decode the bytes, guessing the format from their content rather than
    /// trusting the declared type.
    pub fn decode(&self) -> Result<DynamicImage, ImageProcessingError> {
        image::load_from_memory(&self.data).map_err(ImageProcessingError::from)
    }
}

/// Canonical encoding of an uploaded image, ready to hand to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

/// Binary payload sent to the provider alongside the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl From<NormalizedImage> for Attachment {
    fn from(image: NormalizedImage) -> Self {
        Self {
            mime_type: image.mime_type.to_string(),
            data: image.data,
        }
    }
}
