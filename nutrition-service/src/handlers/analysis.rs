use crate::models::{AnalysisResult, UploadedImage};
use crate::startup::AppState;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

/// Multipart field carrying the photo.
const FILE_FIELD: &str = "file";

/// Analyze an uploaded product photo.
pub async fn analyze_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let upload = read_image_field(&mut multipart).await?;

    tracing::info!(
        content_type = %upload.content_type,
        file_name = upload.file_name.as_deref().unwrap_or("unnamed"),
        size = upload.data.len(),
        "Image upload received"
    );

    let image = tokio::task::spawn_blocking(move || upload.decode())
        .await
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Unexpected error: {}", e)))??;

    let result = state.analyzer.analyze(image).await?;

    tracing::info!(
        fat_content = result.fat_content.as_deref().unwrap_or("-"),
        gluten_free = ?result.gluten_free,
        "Image analysis completed"
    );

    Ok(Json(result))
}

/// Read the `file` field, rejecting non-image content types before the
/// body is buffered.
async fn read_image_field(multipart: &mut Multipart) -> Result<UploadedImage, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let mut upload = UploadedImage::new(Vec::new(), field.content_type().unwrap_or_default());
        if !upload.is_image() {
            tracing::error!(content_type = %upload.content_type, "Invalid file type");
            return Err(AppError::BadRequest(anyhow::anyhow!("File must be an image")));
        }

        upload.file_name = field.file_name().map(|s| s.to_string());
        upload.data = field.bytes().await.map_err(multipart_error)?.to_vec();

        return Ok(upload);
    }

    Err(AppError::BadRequest(anyhow::anyhow!("No file uploaded")))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(anyhow::anyhow!(
            "Failed to read multipart field: {}",
            err.body_text()
        ))
    }
}
