use crate::api::AppState;
use crate::api::schemas::contact::{ContactFields, ContactRequest, ContactResponse};
use crate::domain::submission::{Attachment, ContactForm};
use crate::error::{AppError, Result};
use axum::{
    Form, Json,
    extract::{FromRequest, Multipart, Request, State, multipart::MultipartError},
    http::header,
    response::IntoResponse,
};

/// Contact form input from a multipart form, a urlencoded form or a JSON body.
#[derive(Debug)]
pub struct ContactSubmission(pub ContactForm);

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Validation(e.body_text())
}

fn has_content_type(req: &Request, expected: &str) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with(expected))
}

async fn read_multipart(mut multipart: Multipart) -> Result<ContactForm> {
    let mut form = ContactForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => form.name = Some(field.text().await.map_err(multipart_error)?),
            "email" => form.email = Some(field.text().await.map_err(multipart_error)?),
            "message" => form.message = Some(field.text().await.map_err(multipart_error)?),
            "file" if form.file.is_none() => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(ToString::to_string);
                let content = field.bytes().await.map_err(multipart_error)?;
                form.file = Some(Attachment { filename, content_type, content });
            }
            _ => {}
        }
    }

    Ok(form)
}

impl<S> FromRequest<S> for ContactSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let form = if has_content_type(&req, "multipart/form-data") {
            let multipart =
                Multipart::from_request(req, state).await.map_err(|e| AppError::Validation(e.body_text()))?;
            read_multipart(multipart).await?
        } else if has_content_type(&req, "application/x-www-form-urlencoded") {
            let Form(fields) = Form::<ContactFields>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            fields.into()
        } else {
            let Json(body) = Json::<ContactRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            body.into_form().map_err(AppError::Validation)?
        };

        Ok(Self(form))
    }
}

/// Accepts a contact form submission.
///
/// # Errors
/// Returns the classified pipeline failure; see `SubmissionService::submit`.
pub async fn submit_contact(
    State(state): State<AppState>,
    ContactSubmission(form): ContactSubmission,
) -> Result<impl IntoResponse> {
    let receipt = state.submission_service.submit(form).await?;

    Ok(Json(ContactResponse {
        success: true,
        submission_id: receipt.submission_id,
        file_url: receipt.file_url,
        message: "Contact form submitted successfully",
    }))
}
