use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "session_id";

/// Cookie carrying a one-shot flash message across a redirect
pub const FLASH_COOKIE: &str = "flash";

/// Session token extracted from the request cookie, if any
///
/// Presence of a token says nothing about validity; handlers still resolve
/// it through the session store.
#[derive(Clone, Debug)]
pub struct SessionToken(pub Option<String>);

/// Middleware that parses the session cookie into a request extension
///
/// Handlers read the token via `Extension(SessionToken)` instead of parsing
/// headers themselves.
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    let token = read_cookie(request.headers(), SESSION_COOKIE);
    request.extensions_mut().insert(SessionToken(token));
    next.run(request).await
}

/// Reads a single cookie value out of the `Cookie` header
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(header::COOKIE)?.to_str().ok()?;
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// A one-shot user-visible message with a display level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: String,
    pub message: String,
}

impl Flash {
    pub fn success(message: &str) -> Self {
        Self::new("success", message)
    }

    pub fn info(message: &str) -> Self {
        Self::new("info", message)
    }

    pub fn danger(message: &str) -> Self {
        Self::new("danger", message)
    }

    fn new(level: &str, message: &str) -> Self {
        Self {
            level: level.to_string(),
            message: message.to_string(),
        }
    }

    /// Encodes the flash into a short-lived cookie value
    ///
    /// Base64 keeps arbitrary message text within the cookie value grammar.
    pub fn to_cookie(&self) -> HeaderValue {
        let encoded = URL_SAFE_NO_PAD.encode(format!("{}:{}", self.level, self.message));
        // The value is base64 plus fixed ASCII attributes, always a valid header.
        HeaderValue::from_str(&format!(
            "{}={}; Path=/; Max-Age=30; HttpOnly",
            FLASH_COOKIE, encoded
        ))
        .expect("base64 flash cookie is ASCII")
    }

    /// Decodes a flash from the request cookies, if one was set
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let raw = read_cookie(headers, FLASH_COOKIE)?;
        let decoded = URL_SAFE_NO_PAD.decode(raw.as_bytes()).ok()?;
        let text = String::from_utf8(decoded).ok()?;
        let (level, message) = text.split_once(':')?;
        Some(Self::new(level, message))
    }
}

/// Cookie that installs a session token, HttpOnly for the session lifetime
pub fn session_cookie(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, token))
        .unwrap_or_else(|e| {
            // Tokens come from the session store; anything unrepresentable
            // here is a store bug, but dropping the cookie beats panicking.
            tracing::warn!(error = %e, "Session token is not a valid cookie value");
            HeaderValue::from_static("")
        })
}

/// Cookie that expires the session token immediately
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static("session_id=; Path=/; Max-Age=0; HttpOnly")
}

/// Cookie that expires the flash message after it has been rendered
pub fn clear_flash_cookie() -> HeaderValue {
    HeaderValue::from_static("flash=; Path=/; Max-Age=0; HttpOnly")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_read_cookie_finds_named_value() {
        let headers = headers_with_cookie("a=1; session_id=tok123; b=2");
        assert_eq!(
            read_cookie(&headers, SESSION_COOKIE),
            Some("tok123".to_string())
        );
    }

    #[test]
    fn test_read_cookie_missing() {
        let headers = headers_with_cookie("a=1");
        assert_eq!(read_cookie(&headers, SESSION_COOKIE), None);
        assert_eq!(read_cookie(&HeaderMap::new(), SESSION_COOKIE), None);
    }

    #[test]
    fn test_flash_cookie_roundtrip() {
        let flash = Flash::danger("Invalid username or password. Please try again.");
        let cookie = flash.to_cookie();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(
                cookie.to_str().unwrap().split(';').next().unwrap(),
            )
            .unwrap(),
        );

        assert_eq!(Flash::from_headers(&headers), Some(flash));
    }

    #[test]
    fn test_flash_cookie_representable_for_arbitrary_text() {
        // Raw newlines and non-ASCII would be invalid header values; the
        // base64 encoding must keep them representable.
        let flash = Flash::danger("line one\nline two \u{00e9}\u{00e8}");
        let cookie = flash.to_cookie();
        assert!(cookie.to_str().is_ok());

        let headers =
            headers_with_cookie(cookie.to_str().unwrap().split(';').next().unwrap());
        assert_eq!(Flash::from_headers(&headers), Some(flash));
    }

    #[test]
    fn test_flash_message_with_colon_survives() {
        let flash = Flash::info("Note: steps may vary.");
        let cookie = flash.to_cookie();

        let headers =
            headers_with_cookie(cookie.to_str().unwrap().split(';').next().unwrap());
        assert_eq!(Flash::from_headers(&headers), Some(flash));
    }
}
