//! Extraction of structured fields from the model's free-text reply.

use crate::models::{AnalysisResult, GlutenStatus};
use once_cell::sync::Lazy;
use regex::Regex;

/// Amount written before the word, e.g. "10g fat", "12% of fat".
static AMOUNT_BEFORE_FAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?(?:g|%)?)\s*(?:of\s*)?fat").expect("valid fat amount pattern")
});

/// Amount written after a fat label, e.g. "fat content: 10g", "total fat 5 g".
static AMOUNT_AFTER_FAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"fat[a-z ]{0,12}[:\-]?\s*(\d+(?:\.\d+)?(?:\s?(?:g|%))?)")
        .expect("valid fat label pattern")
});

/// Gluten phrases checked in this order; the first one present decides,
/// wherever it appears in the text.
const GLUTEN_INDICATORS: [(&str, bool); 4] = [
    ("gluten-free", true),
    ("no gluten", true),
    ("contains gluten", false),
    ("not gluten-free", false),
];

/// Build the structured result from a reply. Never fails: fields that
/// cannot be found stay unset and the full reply is kept.
pub fn parse_reply(reply: &str) -> AnalysisResult {
    let lowered = reply.to_lowercase();

    AnalysisResult {
        fat_content: extract_fat_content(&lowered),
        gluten_free: detect_gluten_status(&lowered),
        additional_info: Some(reply.to_string()),
    }
}

/// First fat amount found, scanning lines that mention fat in order.
pub fn extract_fat_content(lowered: &str) -> Option<String> {
    lowered
        .lines()
        .filter(|line| line.contains("fat"))
        .find_map(|line| {
            AMOUNT_BEFORE_FAT
                .captures(line)
                .or_else(|| AMOUNT_AFTER_FAT.captures(line))
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
}

pub fn detect_gluten_status(lowered: &str) -> Option<GlutenStatus> {
    GLUTEN_INDICATORS
        .iter()
        .find(|(indicator, _)| lowered.contains(indicator))
        .map(|&(_, is_gluten_free)| GlutenStatus::from_free(is_gluten_free))
}
