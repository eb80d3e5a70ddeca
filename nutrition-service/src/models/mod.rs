//! Domain models for the nutrition service.

pub mod analysis;
pub mod upload;

pub use analysis::{AnalysisResult, GlutenStatus};
pub use upload::{Attachment, NormalizedImage, UploadedImage};
