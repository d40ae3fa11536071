//! Credential extraction from the `Authorization` header
//!
//! Two schemes share the header and are told apart only by their keyword.
//! `Bearer` is matched case-sensitively. `ApiKey` is matched ignoring ASCII
//! case, and exactly the matched span is stripped. Neither extractor ever
//! hands back the other scheme's payload.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use chirpy_common::AuthError;
use chirpy_service::Credential;

/// Keyword (with separator) of a session token credential
pub const BEARER_SCHEME: &str = "Bearer ";

/// Keyword (with separator) of a webhook API key credential
pub const API_KEY_SCHEME: &str = "ApiKey ";

fn authorization_value(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MalformedCredential)
}

fn non_empty(payload: &str) -> Result<String, AuthError> {
    match payload.trim() {
        "" => Err(AuthError::MalformedCredential),
        trimmed => Ok(trimmed.to_string()),
    }
}

fn strip_api_key_scheme(value: &str) -> Option<&str> {
    let (scheme, rest) = value.split_at_checked(API_KEY_SCHEME.len())?;
    scheme.eq_ignore_ascii_case(API_KEY_SCHEME).then_some(rest)
}

/// Extract a session token from `Authorization: Bearer <token>`
///
/// # Errors
/// `MissingCredential` if there is no header, `MalformedCredential` if the
/// scheme is wrong, the value is not visible ASCII, or the token is blank
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, AuthError> {
    let value = authorization_value(headers)?;
    let token = value
        .strip_prefix(BEARER_SCHEME)
        .ok_or(AuthError::MalformedCredential)?;
    non_empty(token)
}

/// Extract an API key from `Authorization: ApiKey <key>`
///
/// # Errors
/// Same as [`extract_bearer`]
pub fn extract_api_key(headers: &HeaderMap) -> Result<String, AuthError> {
    let value = authorization_value(headers)?;
    let key = strip_api_key_scheme(value).ok_or(AuthError::MalformedCredential)?;
    non_empty(key)
}

/// Extract whichever credential the header carries
///
/// # Errors
/// Same as [`extract_bearer`]
pub fn extract_credential(headers: &HeaderMap) -> Result<Credential, AuthError> {
    let value = authorization_value(headers)?;
    if let Some(token) = value.strip_prefix(BEARER_SCHEME) {
        return non_empty(token).map(Credential::Bearer);
    }
    match strip_api_key_scheme(value) {
        Some(key) => non_empty(key).map(Credential::ApiKey),
        None => Err(AuthError::MalformedCredential),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer() {
        assert_eq!(extract_bearer(&headers("Bearer abc123")).unwrap(), "abc123");
        assert_eq!(extract_bearer(&headers("Bearer   abc123  ")).unwrap(), "abc123");
    }

    #[test]
    fn test_bearer_missing_header() {
        assert_eq!(
            extract_bearer(&HeaderMap::new()),
            Err(AuthError::MissingCredential)
        );
    }

    #[test]
    fn test_bearer_malformed() {
        for value in ["bearer abc123", "BEARER abc123", "Bearer ", "Bearer    ", "Bearerabc", "abc123", "Basic dXNlcjpwYXNz"] {
            assert_eq!(
                extract_bearer(&headers(value)),
                Err(AuthError::MalformedCredential),
                "{value:?}"
            );
        }
    }

    #[test]
    fn test_bearer_rejects_non_visible_ascii() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer caf\xc3\xa9").unwrap(),
        );
        assert_eq!(extract_bearer(&headers), Err(AuthError::MalformedCredential));
    }

    #[test]
    fn test_api_key() {
        assert_eq!(extract_api_key(&headers("ApiKey f271c81f")).unwrap(), "f271c81f");
        assert_eq!(extract_api_key(&headers("apikey f271c81f")).unwrap(), "f271c81f");
        assert_eq!(extract_api_key(&headers("APIKEY   f271c81f ")).unwrap(), "f271c81f");
    }

    #[test]
    fn test_api_key_malformed() {
        for value in ["ApiKey ", "ApiKeyf271c81f", "Api f271c81f", "Key", ""] {
            assert_eq!(
                extract_api_key(&headers(value)),
                Err(AuthError::MalformedCredential),
                "{value:?}"
            );
        }
        assert_eq!(extract_api_key(&HeaderMap::new()), Err(AuthError::MissingCredential));
    }

    #[test]
    fn test_schemes_do_not_cross() {
        assert_eq!(
            extract_api_key(&headers("Bearer abc123")),
            Err(AuthError::MalformedCredential)
        );
        assert_eq!(
            extract_bearer(&headers("ApiKey abc123")),
            Err(AuthError::MalformedCredential)
        );
    }

    #[test]
    fn test_extract_credential() {
        assert_eq!(
            extract_credential(&headers("Bearer abc123")).unwrap(),
            Credential::Bearer("abc123".to_string())
        );
        assert_eq!(
            extract_credential(&headers("apiKey abc123")).unwrap(),
            Credential::ApiKey("abc123".to_string())
        );
        assert_eq!(
            extract_credential(&headers("Token abc123")),
            Err(AuthError::MalformedCredential)
        );
        assert_eq!(
            extract_credential(&HeaderMap::new()),
            Err(AuthError::MissingCredential)
        );
    }
}
