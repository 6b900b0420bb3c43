use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use log::debug;

fn authorization_value<'a>(headers: &'a HeaderMap, scheme: &str) -> Option<&'a str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (prefix, rest) = value.split_at_checked(scheme.len())?;
    if prefix.eq_ignore_ascii_case(scheme) && rest.starts_with(' ') {
        Some(rest.trim())
    } else {
        None
    }
}

/// Client ID and secret from an `Authorization: Basic` header
pub(crate) fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let encoded = authorization_value(headers, "Basic")?;
    let decoded = match STANDARD.decode(encoded) {
        Ok(decoded) => decoded,
        Err(e) => {
            debug!("Ignoring malformed Basic credentials: {}", e);
            return None;
        }
    };
    let decoded = String::from_utf8(decoded).ok()?;
    let (id, secret) = decoded.split_once(':')?;
    Some((id.to_string(), secret.to_string()))
}

/// Access token from an `Authorization: Bearer` header
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    authorization_value(headers, "Bearer")
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// First value of `name` in a form-encoded string
pub(crate) fn form_parameter(encoded: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(encoded.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(authorization).unwrap());
        headers
    }

    #[test]
    fn test_basic_credentials() {
        // base64("app:s3cr:et")
        let credentials = basic_credentials(&headers("Basic YXBwOnMzY3I6ZXQ="));
        assert_eq!(
            credentials,
            Some(("app".to_string(), "s3cr:et".to_string()))
        );
        assert_eq!(
            basic_credentials(&headers("basic YXBwOnMzY3I6ZXQ=")),
            credentials
        );
    }

    #[test]
    fn test_basic_credentials_rejects_malformed() {
        assert_eq!(basic_credentials(&HeaderMap::new()), None);
        assert_eq!(basic_credentials(&headers("Bearer abc")), None);
        assert_eq!(basic_credentials(&headers("Basic !!!")), None);
        // base64("no-colon")
        assert_eq!(basic_credentials(&headers("Basic bm8tY29sb24=")), None);
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc".to_string()));
        assert_eq!(bearer_token(&headers("bearer  abc ")), Some("abc".to_string()));
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearerabc")), None);
        assert_eq!(bearer_token(&headers("Basic abc")), None);
    }

    #[test]
    fn test_form_parameter() {
        assert_eq!(
            form_parameter("scope=openid&access_token=a%2Bb", "access_token"),
            Some("a+b".to_string())
        );
        assert_eq!(form_parameter("access_token=", "access_token"), None);
        assert_eq!(form_parameter("", "access_token"), None);
    }
}
