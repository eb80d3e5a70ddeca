pub mod analyzer;
pub mod metrics;
pub mod normalizer;
pub mod parser;
pub mod providers;

pub use analyzer::{ProductAnalyzer, ANALYSIS_PROMPT};
pub use normalizer::ImageNormalizer;
pub use self::metrics::{get_metrics, init_metrics};
