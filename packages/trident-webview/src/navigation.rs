//! Shaping host navigation calls into the engine's navigation parameters.

use tracing::warn;

/// `navNoHistory`
pub const NAV_NO_HISTORY: i32 = 0x2;
/// `navNoReadFromCache`
pub const NAV_NO_READ_FROM_CACHE: i32 = 0x4;
/// `navNoWriteToCache`
pub const NAV_NO_WRITE_TO_CACHE: i32 = 0x8;

/// Flags used for every navigation the webview issues.
pub const NAV_UNCACHED: i32 = NAV_NO_HISTORY | NAV_NO_READ_FROM_CACHE | NAV_NO_WRITE_TO_CACHE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpHeader {
    pub name: String,
    pub value: String,
}

impl HttpHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Everything the engine's `Navigate` accepts.
///
/// The engine has no method parameter: the presence of `post_data` makes the
/// request a POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigateRequest {
    pub url: String,
    pub flags: i32,
    /// Extra headers as one `"Name: value\r\n"` block.
    pub headers: Option<String>,
    pub post_data: Option<Vec<u8>>,
}

impl NavigateRequest {
    /// Plain uncached navigation.
    pub fn to(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            flags: NAV_UNCACHED,
            headers: None,
            post_data: None,
        }
    }

    /// Build a request from the host's HTTP-shaped arguments.
    pub fn from_http(method: &str, url: &str, headers: &[HttpHeader], body: Option<&[u8]>) -> Self {
        let mut request = Self::to(url);
        request.headers = header_block(headers);

        let method = method.trim().to_ascii_uppercase();
        request.post_data = match (method.as_str(), body) {
            ("POST", body) => Some(body.map(<[u8]>::to_vec).unwrap_or_default()),
            ("GET" | "HEAD" | "", Some(_)) => {
                warn!(%method, url, "request body dropped for a method without a body");
                None
            }
            ("GET" | "HEAD" | "", None) => None,
            (other, body) => {
                warn!(
                    method = other,
                    url, "method not supported by the engine, sending as GET or POST"
                );
                body.map(<[u8]>::to_vec)
            }
        };
        request
    }
}

fn header_block(headers: &[HttpHeader]) -> Option<String> {
    let mut block = String::new();
    for header in headers {
        let name = header.name.trim();
        if name.is_empty() || name.contains(['\r', '\n', ':']) || header.value.contains(['\r', '\n']) {
            warn!(name = %header.name, "dropping malformed request header");
            continue;
        }
        block.push_str(name);
        block.push_str(": ");
        block.push_str(header.value.trim());
        block.push_str("\r\n");
    }
    (!block.is_empty()).then_some(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_navigation_suppresses_history_and_cache() {
        let req = NavigateRequest::to("C:\\app\\index.html");
        assert_eq!(req.flags, 0x2 | 0x4 | 0x8);
        assert!(req.headers.is_none());
        assert!(req.post_data.is_none());
    }

    #[test]
    fn headers_are_joined_into_one_block() {
        let req = NavigateRequest::from_http(
            "GET",
            "https://example.com/",
            &[
                HttpHeader::new("Accept", "text/html"),
                HttpHeader::new("X-Token", " abc "),
            ],
            None,
        );
        assert_eq!(
            req.headers.as_deref(),
            Some("Accept: text/html\r\nX-Token: abc\r\n")
        );
        assert!(req.post_data.is_none());
    }

    #[test]
    fn header_injection_is_dropped() {
        let req = NavigateRequest::from_http(
            "GET",
            "https://example.com/",
            &[
                HttpHeader::new("X-Evil", "a\r\nHost: other"),
                HttpHeader::new("", "empty"),
                HttpHeader::new("Bad:Name", "x"),
            ],
            None,
        );
        assert!(req.headers.is_none());
    }

    #[test]
    fn post_carries_body_even_when_empty() {
        let req = NavigateRequest::from_http("post", "https://example.com/form", &[], Some(b"a=1"));
        assert_eq!(req.post_data.as_deref(), Some(&b"a=1"[..]));

        let req = NavigateRequest::from_http("POST", "https://example.com/form", &[], None);
        assert_eq!(req.post_data.as_deref(), Some(&b""[..]));
    }

    #[test]
    fn get_drops_body() {
        let req = NavigateRequest::from_http("GET", "https://example.com/", &[], Some(b"ignored"));
        assert!(req.post_data.is_none());
    }

    #[test]
    fn unsupported_method_falls_back_on_body_presence() {
        let put = NavigateRequest::from_http("PUT", "https://example.com/", &[], Some(b"x"));
        assert_eq!(put.post_data.as_deref(), Some(&b"x"[..]));

        let delete = NavigateRequest::from_http("DELETE", "https://example.com/", &[], None);
        assert!(delete.post_data.is_none());
    }
}
