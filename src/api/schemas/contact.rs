use crate::domain::submission::{Attachment, ContactForm};
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonAttachment {
    pub filename: String,
    pub content_type: Option<String>,
    /// Base64 encoded file content
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub file: Option<JsonAttachment>,
}

impl ContactRequest {
    /// Converts the JSON payload into a form, decoding any inline file.
    ///
    /// # Errors
    /// Returns an error if the file content is not valid base64.
    pub fn into_form(self) -> Result<ContactForm, String> {
        let file = self
            .file
            .map(|f| {
                let content = base64::engine::general_purpose::STANDARD
                    .decode(f.content.trim())
                    .map_err(|e| format!("File content is not valid base64: {e}"))?;
                Ok::<_, String>(Attachment {
                    filename: f.filename,
                    content_type: f.content_type,
                    content: Bytes::from(content),
                })
            })
            .transpose()?;

        Ok(ContactForm { name: self.name, email: self.email, message: self.message, file })
    }
}

/// Plain HTML form post; carries no file.
#[derive(Debug, Deserialize)]
pub struct ContactFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl From<ContactFields> for ContactForm {
    fn from(fields: ContactFields) -> Self {
        Self { name: fields.name, email: fields.email, message: fields.message, file: None }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    pub submission_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_form_decodes_file() {
        let req: ContactRequest = serde_json::from_str(
            r#"{"name":"Ada","email":"ada@x.com","message":"hi","file":{"filename":"a.txt","contentType":"text/plain","content":"aGVsbG8="}}"#,
        )
        .expect("valid json");
        let form = req.into_form().expect("valid base64");
        let file = form.file.expect("file present");
        assert_eq!(file.content, Bytes::from_static(b"hello"));
        assert_eq!(file.content_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn test_into_form_rejects_bad_base64() {
        let req: ContactRequest =
            serde_json::from_str(r#"{"name":"Ada","file":{"filename":"a.txt","content":"***"}}"#).expect("valid json");
        let err = req.into_form().expect_err("bad base64");
        assert!(err.starts_with("File content is not valid base64"));
    }

    #[test]
    fn test_response_omits_missing_file_url() {
        let body = ContactResponse {
            success: true,
            submission_id: "abc".into(),
            file_url: None,
            message: "Contact form submitted successfully",
        };
        let json = serde_json::to_value(&body).expect("serializable");
        assert_eq!(json["submissionId"], "abc");
        assert!(json.get("fileUrl").is_none());
    }
}
