//! `Authorization: Bearer` header parsing.

use axum::http::{HeaderMap, header};

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme name is matched case-insensitively. Returns `None` for a
/// missing header, another scheme, or an empty token.
pub fn get_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(get_bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        assert_eq!(get_bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(get_bearer_token(&headers("BEARER  abc ")), Some("abc"));
    }

    #[test]
    fn test_other_scheme_ignored() {
        assert_eq!(get_bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
    }

    #[test]
    fn test_empty_token_ignored() {
        assert_eq!(get_bearer_token(&headers("Bearer ")), None);
        assert_eq!(get_bearer_token(&headers("Bearer")), None);
    }

    #[test]
    fn test_no_header() {
        assert_eq!(get_bearer_token(&HeaderMap::new()), None);
    }
}
