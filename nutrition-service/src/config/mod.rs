use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Gemini REST API base URL.
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default upload limit (20MB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

const DEFAULT_GEMINI_TIMEOUT_SECONDS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct NutritionConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub http: HttpSettings,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: String,
    /// Multimodal model used for product analysis (e.g., gemini-1.5-flash)
    pub model: String,
    pub api_base: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// Directory holding index.html and its assets
    pub static_dir: String,
    pub max_upload_bytes: usize,
}

impl NutritionConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(NutritionConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key: get_env("GEMINI_API_KEY", None, is_prod)?,
                model: get_env("GEMINI_MODEL", Some("gemini-1.5-flash"), is_prod)?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), false)?,
                timeout_seconds: get_env(
                    "GEMINI_TIMEOUT_SECONDS",
                    Some(&DEFAULT_GEMINI_TIMEOUT_SECONDS.to_string()),
                    false,
                )?
                .parse()
                .unwrap_or(DEFAULT_GEMINI_TIMEOUT_SECONDS),
            },
            http: HttpSettings {
                static_dir: get_env("STATIC_DIR", Some("static"), false)?,
                max_upload_bytes: get_env(
                    "MAX_UPLOAD_BYTES",
                    Some(&DEFAULT_MAX_UPLOAD_BYTES.to_string()),
                    false,
                )?
                .parse()
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
