use bytes::Bytes;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

/// Prefix for every attachment key in the bucket.
pub const ATTACHMENT_PREFIX: &str = "contact-attachments";

const FALLBACK_FILENAME: &str = "attachment";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    New,
    Test,
}

impl SubmissionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Test => "test",
        }
    }
}

/// A file supplied alongside the form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: Option<String>,
    pub content: Bytes,
}

impl Attachment {
    /// Browsers submit an empty, unnamed file part when nothing was picked.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.filename.trim().is_empty() && self.content.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Raw form input as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub file: Option<Attachment>,
}

/// Form input with every required field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub message: String,
}

fn present(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl ContactForm {
    /// Names of required fields that are absent or blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [("name", &self.name), ("email", &self.email), ("message", &self.message)]
            .into_iter()
            .filter(|(_, value)| !present(value.as_ref()))
            .map(|(field, _)| field)
            .collect()
    }

    /// Splits the form into its details and the real attachment, if any.
    ///
    /// # Errors
    /// Returns the list of missing field names when any required field is blank.
    pub fn into_parts(self) -> Result<(ContactDetails, Option<Attachment>), Vec<&'static str>> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(missing);
        }

        let file = self.file.filter(|f| !f.is_placeholder());
        let details = ContactDetails {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
        };
        Ok((details, file))
    }
}

/// One persisted contact form entry. Write-once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub file_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub status: SubmissionStatus,
}

impl Submission {
    #[must_use]
    pub fn new(id: String, details: ContactDetails, file_url: Option<String>, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            name: details.name,
            email: details.email,
            message: details.message,
            file_url,
            created_at,
            status: SubmissionStatus::New,
        }
    }

    /// Throwaway record written by the diagnostics write probe.
    #[must_use]
    pub fn diagnostic(id: String, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            name: "Test User".into(),
            email: "test@example.com".into(),
            message: "This is a test write from the diagnostic tool".into(),
            file_url: None,
            created_at,
            status: SubmissionStatus::Test,
        }
    }

    /// ISO-8601 creation time.
    #[must_use]
    pub fn timestamp(&self) -> String {
        self.created_at.format(&Rfc3339).unwrap_or_else(|_| self.created_at.unix_timestamp().to_string())
    }
}

#[must_use]
pub fn new_submission_id() -> String {
    Uuid::now_v7().to_string()
}

#[must_use]
pub fn new_test_id() -> String {
    format!("test-{}", Uuid::now_v7())
}

/// Replaces every character outside `[A-Za-z0-9.-]` with `_`.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    let sanitized: String =
        filename.chars().map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' }).collect();

    if sanitized.is_empty() { FALLBACK_FILENAME.to_string() } else { sanitized }
}

/// `contact-attachments/<submission id>/<sanitized filename>`
#[must_use]
pub fn attachment_key(submission_id: &str, filename: &str) -> String {
    format!("{ATTACHMENT_PREFIX}/{submission_id}/{}", sanitize_filename(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: Some(name.into()),
            email: Some(email.into()),
            message: Some(message.into()),
            file: None,
        }
    }

    #[test]
    fn test_sanitize_replaces_non_ascii() {
        assert_eq!(sanitize_filename("résumé.pdf"), "r_sum_.pdf");
        assert_eq!(sanitize_filename("my file (1).tar.gz"), "my_file__1_.tar.gz");
        assert_eq!(sanitize_filename("../etc/passwd"), ".._etc_passwd");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for name in ["résumé.pdf", "a b/c\\d", "plain-name.txt", "", "日本語.doc"] {
            let once = sanitize_filename(name);
            assert_eq!(sanitize_filename(&once), once);
        }
    }

    #[test]
    fn test_sanitize_empty_filename() {
        assert_eq!(sanitize_filename(""), "attachment");
    }

    #[test]
    fn test_attachment_key_layout() {
        assert_eq!(attachment_key("abc", "résumé.pdf"), "contact-attachments/abc/r_sum_.pdf");
    }

    #[test]
    fn test_missing_fields() {
        assert!(form("Ada", "ada@x.com", "hello").missing_fields().is_empty());
        assert_eq!(form("", "ada@x.com", "  ").missing_fields(), vec!["name", "message"]);
        assert_eq!(ContactForm::default().missing_fields(), vec!["name", "email", "message"]);
    }

    #[test]
    fn test_into_parts_drops_placeholder_file() {
        let mut input = form("Ada", "ada@x.com", "hello");
        input.file = Some(Attachment { filename: String::new(), content_type: None, content: Bytes::new() });
        let (details, file) = input.into_parts().expect("valid form");
        assert_eq!(details.name, "Ada");
        assert!(file.is_none());
    }

    #[test]
    fn test_into_parts_keeps_real_file() {
        let mut input = form("Ada", "ada@x.com", "hello");
        input.file = Some(Attachment {
            filename: "cv.pdf".into(),
            content_type: Some("application/pdf".into()),
            content: Bytes::from_static(b"%PDF"),
        });
        let (_, file) = input.into_parts().expect("valid form");
        assert_eq!(file.map(|f| f.filename), Some("cv.pdf".to_string()));
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(new_submission_id(), new_submission_id());
        assert!(new_test_id().starts_with("test-"));
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let created_at = OffsetDateTime::from_unix_timestamp(0).expect("epoch");
        let submission = Submission::diagnostic("id".into(), created_at);
        assert_eq!(submission.timestamp(), "1970-01-01T00:00:00Z");
        assert_eq!(submission.status.as_str(), "test");
    }
}
