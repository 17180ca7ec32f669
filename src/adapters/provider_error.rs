use crate::error::AppError;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata};
use std::error::Error;

const AUTHENTICATION_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "ExpiredToken",
    "ExpiredTokenException",
    "IncompleteSignature",
    "InvalidAccessKeyId",
    "InvalidClientTokenId",
    "InvalidSignatureException",
    "MissingAuthenticationToken",
    "SignatureDoesNotMatch",
    "UnrecognizedClientException",
];

const NOT_FOUND_CODES: &[&str] = &["NoSuchBucket", "NoSuchKey", "NotFound", "ResourceNotFoundException"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProviderFailure {
    Authentication,
    NotFound,
    Other,
}

/// Maps a provider error code and message onto a failure class.
pub(crate) fn classify(code: Option<&str>, message: Option<&str>) -> ProviderFailure {
    if let Some(code) = code {
        if AUTHENTICATION_CODES.contains(&code) {
            return ProviderFailure::Authentication;
        }
        if NOT_FOUND_CODES.contains(&code) {
            return ProviderFailure::NotFound;
        }
    }

    if message.is_some_and(|m| m.to_ascii_lowercase().contains("signature")) {
        return ProviderFailure::Authentication;
    }

    ProviderFailure::Other
}

pub(crate) fn describe<E>(err: &E) -> String
where
    E: ProvideErrorMetadata + Error + 'static,
{
    match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (None, Some(message)) => message.to_string(),
        _ => DisplayErrorContext(err).to_string(),
    }
}

/// Translates a record store or identity error into the caller-facing taxonomy.
pub(crate) fn store_error<E>(err: &E, resource: &str) -> AppError
where
    E: ProvideErrorMetadata + Error + 'static,
{
    let details = describe(err);
    match classify(err.code(), err.message()) {
        ProviderFailure::Authentication => AppError::Authentication { details, credentials: None },
        ProviderFailure::NotFound => AppError::NotFound { resource: resource.to_string(), details },
        ProviderFailure::Other => AppError::Persistence(details),
    }
}
