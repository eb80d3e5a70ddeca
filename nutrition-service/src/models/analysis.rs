use serde::{Deserialize, Serialize};

/// Whether the model reported the product as gluten-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlutenStatus {
    Yes,
    No,
}

impl GlutenStatus {
    pub fn from_free(is_gluten_free: bool) -> Self {
        if is_gluten_free {
            GlutenStatus::Yes
        } else {
            GlutenStatus::No
        }
    }
}

/// Nutritional summary returned by `POST /api/analyze`.
///
/// Every field may be null; a reply the parser cannot pick apart still
/// yields a valid result carrying the raw text in `additional_info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Fat content of the product, e.g. "10g" or "12%".
    pub fat_content: Option<String>,

    /// Whether the product is gluten-free.
    pub gluten_free: Option<GlutenStatus>,

    /// The model's full reply.
    pub additional_info: Option<String>,
}
