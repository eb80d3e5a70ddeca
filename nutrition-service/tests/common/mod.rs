//! Shared helpers for spawning the service against a mock provider.
#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use nutrition_service::config::{GeminiSettings, HttpSettings, NutritionConfig};
use nutrition_service::services::providers::mock::{MockReply, MockVisionProvider};
use nutrition_service::startup::Application;
use service_core::config::Config;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

pub struct TestApp {
    pub address: String,
    pub provider: Arc<MockVisionProvider>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn post_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        mime: &str,
    ) -> reqwest::Response {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .expect("valid mime");
        let form = reqwest::multipart::Form::new().part("file", part);

        self.client
            .post(format!("{}/api/analyze", self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send request")
    }
}

pub fn test_config() -> NutritionConfig {
    NutritionConfig {
        common: Config {
            port: 0,
            log_level: "debug".to_string(),
        },
        gemini: GeminiSettings {
            api_key: "test-api-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 5,
        },
        http: HttpSettings {
            static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string(),
            max_upload_bytes: 1024 * 1024,
        },
        otlp_endpoint: None,
    }
}

/// Spawn the application on a random port with the given mock reply.
pub async fn spawn_app(reply: MockReply) -> TestApp {
    spawn_app_with_config(reply, test_config()).await
}

pub async fn spawn_app_with_config(reply: MockReply, config: NutritionConfig) -> TestApp {
    let provider = Arc::new(MockVisionProvider::new(reply));
    let app = Application::build_with_provider(config, provider.clone())
        .await
        .expect("Failed to build application");
    let address = format!("http://127.0.0.1:{}", app.port());

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    TestApp {
        address,
        provider,
        client: reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build client"),
    }
}

/// Encode a solid-colour square in the given format.
pub fn sample_image(size: u32, format: ImageFormat) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(size, size, Rgb([200, 40, 40])));
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, format)
        .expect("Failed to encode test image");
    buffer.into_inner()
}
