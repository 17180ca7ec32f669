use serde::Serialize;

pub const ACCESS_KEY_ID_LEN: usize = 20;
pub const ACCESS_KEY_ID_PREFIXES: [&str; 2] = ["AKIA", "ASIA"];
pub const SECRET_ACCESS_KEY_LEN: usize = 40;

const VISIBLE_KEY_CHARS: usize = 8;

fn char_len(value: &str) -> usize {
    value.chars().count()
}

#[must_use]
pub fn has_valid_prefix(access_key_id: &str) -> bool {
    ACCESS_KEY_ID_PREFIXES.iter().any(|prefix| access_key_id.starts_with(prefix))
}

#[must_use]
pub fn is_valid_access_key_id(access_key_id: &str) -> bool {
    char_len(access_key_id) == ACCESS_KEY_ID_LEN && has_valid_prefix(access_key_id)
}

#[must_use]
pub fn is_valid_secret_access_key(secret: &str) -> bool {
    char_len(secret) == SECRET_ACCESS_KEY_LEN
}

/// Format problems with an (already trimmed) access key id.
#[must_use]
pub fn access_key_id_warnings(access_key_id: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    let len = char_len(access_key_id);
    if len != ACCESS_KEY_ID_LEN {
        warnings.push(format!("Access Key ID should be {ACCESS_KEY_ID_LEN} characters, got {len}"));
    }
    if !has_valid_prefix(access_key_id) {
        warnings.push(format!("Access Key ID should start with {}", ACCESS_KEY_ID_PREFIXES.join(" or ")));
    }
    warnings
}

/// Format problems with a secret key, given exactly as it was configured.
#[must_use]
pub fn secret_access_key_warnings(raw_secret: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    let len = char_len(raw_secret.trim());
    if len != SECRET_ACCESS_KEY_LEN {
        warnings.push(format!("Secret Access Key should be {SECRET_ACCESS_KEY_LEN} characters, got {len}"));
    }
    if raw_secret != raw_secret.trim() {
        warnings.push("Secret Access Key has leading or trailing spaces!".to_string());
    }
    warnings
}

/// First characters of the key id followed by `***`. Short ids reveal at most half.
#[must_use]
pub fn mask_access_key(access_key_id: &str) -> String {
    let visible = VISIBLE_KEY_CHARS.min(char_len(access_key_id) / 2);
    let prefix: String = access_key_id.chars().take(visible).collect();
    format!("{prefix}***")
}

/// Describes a secret without revealing any of it.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    format!("set ({} characters)", char_len(secret))
}

/// Non-secret description of the credentials in use, attached to authentication failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSummary {
    pub region: String,
    pub access_key_id_prefix: Option<String>,
    pub secret_key_length: usize,
    pub table_name: Option<String>,
}

impl CredentialSummary {
    #[must_use]
    pub fn new(region: &str, access_key_id: Option<&str>, secret: Option<&str>, table_name: Option<&str>) -> Self {
        Self {
            region: region.to_string(),
            access_key_id_prefix: access_key_id.map(mask_access_key),
            secret_key_length: secret.map_or(0, char_len),
            table_name: table_name.map(ToString::to_string),
        }
    }
}
