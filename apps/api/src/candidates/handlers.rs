//! Axum route handlers for the Candidates API.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::candidates::resume::{archive_resume, extract_pdf_text, resume_preview};
use crate::errors::AppError;
use crate::models::candidate::NewCandidate;
use crate::skills::SkillSet;
use crate::state::AppState;

const DEFAULT_NAME: &str = "Candidate";
const DEFAULT_EMAIL: &str = "candidate@example.com";

#[derive(Debug, Serialize)]
pub struct UploadResumeResponse {
    pub candidate_id: i64,
    pub resume_text: String,
    pub skills: SkillSet,
}

/// Parsed multipart form: `resume` (file, required), `name` and `email` (optional text).
#[derive(Debug, Default)]
struct ResumeForm {
    resume: Option<Bytes>,
    name: Option<String>,
    email: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<ResumeForm, AppError> {
    let mut form = ResumeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid file: {e}")))?;
                form.resume = Some(data);
            }
            "name" | "email" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid {name} field: {e}")))?;
                let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
                if name == "name" {
                    form.name = value;
                } else {
                    form.email = value;
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/v1/resumes
///
/// Upload → PDF text → skills (IngestText) → archive PDF → store candidate.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResumeResponse>), AppError> {
    let form = read_form(multipart).await?;

    let pdf = form
        .resume
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    if pdf.is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }

    let resume_text = extract_pdf_text(pdf.clone()).await?;
    let skills = state.extractor.extract_skills(&resume_text).await;
    let s3_key = archive_resume(&state.s3, &state.config.s3_bucket, pdf).await?;

    let candidate = NewCandidate {
        name: form.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
        email: form.email.unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
        resume_text,
        skills,
        resume_s3_key: Some(s3_key),
    };
    let candidate_id = state.store.insert_candidate(&candidate).await?;

    info!("Resume uploaded for candidate {candidate_id}");
    Ok((
        StatusCode::CREATED,
        Json(UploadResumeResponse {
            candidate_id,
            resume_text: resume_preview(&candidate.resume_text),
            skills: candidate.skills,
        }),
    ))
}
