//! Resume processing: PDF text extraction, S3 archival, response preview.

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

pub const PREVIEW_CHARS: usize = 500;

/// Extracts plain text from an uploaded PDF. Parsing runs on the blocking pool.
pub async fn extract_pdf_text(pdf: Bytes) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
        .await
        .map_err(|e| {
            if e.is_panic() {
                AppError::UnprocessableEntity("PDF processing error: malformed document".to_string())
            } else {
                AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}"))
            }
        })?
        .map_err(|e| AppError::UnprocessableEntity(format!("PDF processing error: {e}")))?;

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No text could be extracted from the PDF".to_string(),
        ));
    }
    Ok(text)
}

/// Stores the original PDF under `resumes/<uuid>.pdf` and returns the object key.
pub async fn archive_resume(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    pdf: Bytes,
) -> Result<String, AppError> {
    let key = format!("resumes/{}.pdf", Uuid::new_v4());

    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .content_type("application/pdf")
        .body(ByteStream::from(pdf))
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Failed to archive resume {key}: {e}")))?;

    info!("Archived resume PDF to s3://{bucket}/{key}");
    Ok(key)
}

/// First `PREVIEW_CHARS` characters, with `...` appended when cut.
pub fn resume_preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
