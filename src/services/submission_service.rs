use crate::adapters::Clients;
use crate::adapters::storage::PutObject;
use crate::config::SubmissionConfig;
use crate::domain::submission::{ContactForm, Submission, attachment_key, new_submission_id, sanitize_filename};
use crate::error::{AppError, Result};
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};
use time::OffsetDateTime;

#[derive(Clone, Debug)]
pub(crate) struct Metrics {
    pub(crate) submissions: Counter<u64>,
    pub(crate) attachment_bytes: Histogram<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("contact-relay");
        Self {
            submissions: meter
                .u64_counter("contact_submissions_total")
                .with_description("Contact form submissions by outcome")
                .build(),
            attachment_bytes: meter
                .u64_histogram("contact_attachment_bytes")
                .with_description("Distribution of uploaded attachment sizes")
                .build(),
        }
    }
}

/// What the caller learns about a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub submission_id: String,
    pub file_url: Option<String>,
}

/// Validates a contact form, uploads its attachment and persists the record.
///
/// Upload always completes before the record write starts, so a stored record
/// only ever references an attachment that was already written.
#[derive(Clone, Debug)]
pub struct SubmissionService {
    clients: Clients,
    config: SubmissionConfig,
    metrics: Metrics,
}

impl SubmissionService {
    #[must_use]
    pub fn new(clients: Clients, config: SubmissionConfig) -> Self {
        Self { clients, config, metrics: Metrics::new() }
    }

    /// Runs one submission through validate, upload, persist.
    ///
    /// Nothing is retried. If the record write fails after the upload succeeded, the
    /// uploaded object stays in the bucket and the submission is reported as failed.
    ///
    /// # Errors
    /// Returns `AppError::Validation` before any I/O if a required field is blank or the
    /// attachment is too large, `AppError::Configuration` if the table or bucket is
    /// unset, `AppError::Upload` if the attachment write fails, and
    /// `AppError::Authentication`, `AppError::NotFound` or `AppError::Persistence` if the
    /// record write fails.
    #[tracing::instrument(
        err(level = "warn"),
        skip(self, form),
        fields(submission_id = tracing::field::Empty, attachment_size = tracing::field::Empty)
    )]
    pub async fn submit(&self, form: ContactForm) -> Result<SubmissionReceipt> {
        let result = self.process(form).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind().as_str(),
        };
        self.metrics.submissions.add(1, &[KeyValue::new("outcome", outcome)]);

        result
    }

    async fn process(&self, form: ContactForm) -> Result<SubmissionReceipt> {
        let (details, file) = form
            .into_parts()
            .map_err(|missing| AppError::Validation(format!("Missing required fields: {}", missing.join(", "))))?;

        if let Some(file) = &file {
            tracing::Span::current().record("attachment_size", file.len());
            if file.len() > self.config.max_attachment_bytes {
                return Err(AppError::Validation(format!(
                    "Attachment exceeds the {} byte limit",
                    self.config.max_attachment_bytes
                )));
            }
        }

        // Fail on missing settings before anything is written.
        self.clients.records.table_name()?;
        if file.is_some() {
            self.clients.objects.bucket()?;
        }

        let submission_id = new_submission_id();
        let created_at = OffsetDateTime::now_utc();
        tracing::Span::current().record("submission_id", tracing::field::display(&submission_id));

        let mut object_key = None;
        let mut file_url = None;

        if let Some(file) = file {
            let key = attachment_key(&submission_id, &file.filename);
            let size = file.len() as u64;
            let object = PutObject {
                key: key.clone(),
                body: file.content,
                content_type: file.content_type,
                metadata: vec![
                    ("original-filename".to_string(), sanitize_filename(&file.filename)),
                    ("uploaded-by".to_string(), details.email.clone()),
                    ("submission-id".to_string(), submission_id.clone()),
                ],
            };

            let url = self.clients.objects.put(object).await.map_err(|e| match e {
                AppError::Upload(_) | AppError::Configuration { .. } => e,
                other => AppError::Upload(other.to_string()),
            })?;

            self.metrics.attachment_bytes.record(size, &[]);
            tracing::debug!(object_key = %key, "Attachment uploaded");
            object_key = Some(key);
            file_url = Some(url);
        }

        let submission = Submission::new(submission_id, details, file_url, created_at);

        self.clients.records.put(&submission).await.map_err(|e| {
            if let Some(key) = &object_key {
                tracing::warn!(object_key = %key, "Record write failed, attachment left without a submission");
            }
            e.with_credentials(&self.clients.credentials)
        })?;

        tracing::info!(has_attachment = submission.file_url.is_some(), "Contact form submission stored");

        Ok(SubmissionReceipt { submission_id: submission.id, file_url: submission.file_url })
    }
}
