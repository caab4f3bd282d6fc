//! Credential redaction for log output.

use regex::Regex;
use std::sync::LazyLock;

/// Query parameters that carry provider credentials
static CREDENTIAL_PARAMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(appid|api_key|apikey|key|token)=[^&\s]*").expect("valid credential regex")
});

/// Bearer tokens in header dumps or error strings
static BEARER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)bearer\s+[A-Za-z0-9._\-]+").expect("valid bearer regex")
});

/// Redact provider credentials from a URL or message before it is logged
pub fn redact_credentials(input: &str) -> String {
    let result = CREDENTIAL_PARAMS.replace_all(input, "$1=[REDACTED]");
    BEARER_TOKEN
        .replace_all(&result, "Bearer [REDACTED]")
        .into_owned()
}
