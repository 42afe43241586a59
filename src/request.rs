//! Query-string encoding and CSRF header selection for outgoing requests.
//! The request plumbing itself lives elsewhere; these helpers only decide
//! what to send.

/// Name of the cookie carrying the CSRF token.
pub(crate) const CSRF_COOKIE: &str = "csrftoken";

/// Name of the header the token is forwarded in.
pub(crate) const CSRF_HEADER: &str = "X-CSRF-Token";

/// Serializes flat key/value pairs into a `&`-joined, percent-encoded query
/// string.
pub(crate) fn encode_query_data<'a, I>(data: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let pairs = data
        .into_iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>();
    pairs.join("&")
}

/// Methods that never mutate state and therefore need no CSRF token.
pub(crate) fn csrf_safe_method(method: &str) -> bool {
    method.eq_ignore_ascii_case("GET")
        || method.eq_ignore_ascii_case("HEAD")
        || method.eq_ignore_ascii_case("OPTIONS")
}

/// Looks up one cookie in a `Cookie:`-style `name=value; name=value` string.
pub(crate) fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find_map(|(key, value)| (key == name).then_some(value))
}

/// Returns the header to attach to an outgoing request, if any: only
/// state-changing methods on same-origin targets carry the token, and only
/// when the token cookie is present.
pub(crate) fn csrf_header(
    method: &str,
    same_origin: bool,
    cookie_header: &str,
) -> Option<(&'static str, String)> {
    if csrf_safe_method(method) || !same_origin {
        return None;
    }
    cookie_value(cookie_header, CSRF_COOKIE).map(|token| (CSRF_HEADER, token.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_query_data() {
        assert_eq!(
            encode_query_data([("a", "1"), ("b", "x y")]),
            "a=1&b=x%20y"
        );
    }

    #[test]
    fn test_encode_query_data_empty() {
        assert_eq!(encode_query_data([]), "");
    }

    #[test]
    fn test_encode_query_data_reserved_characters() {
        assert_eq!(
            encode_query_data([("q", "a&b=c"), ("tag", "100%")]),
            "q=a%26b%3Dc&tag=100%25"
        );
    }

    #[test]
    fn test_csrf_safe_methods() {
        assert!(csrf_safe_method("GET"));
        assert!(csrf_safe_method("get"));
        assert!(csrf_safe_method("HEAD"));
        assert!(csrf_safe_method("OPTIONS"));
        assert!(!csrf_safe_method("POST"));
        assert!(!csrf_safe_method("PUT"));
        assert!(!csrf_safe_method("DELETE"));
    }

    #[test]
    fn test_cookie_value() {
        let cookies = "theme=dark; csrftoken=abc123; lang=en";
        assert_eq!(cookie_value(cookies, "csrftoken"), Some("abc123"));
        assert_eq!(cookie_value(cookies, "theme"), Some("dark"));
        assert_eq!(cookie_value(cookies, "missing"), None);
    }

    #[test]
    fn test_csrf_header_on_unsafe_same_origin() {
        assert_eq!(
            csrf_header("POST", true, "csrftoken=tok"),
            Some((CSRF_HEADER, "tok".to_owned()))
        );
    }

    #[test]
    fn test_csrf_header_skipped() {
        // safe method
        assert_eq!(csrf_header("GET", true, "csrftoken=tok"), None);
        // cross-origin
        assert_eq!(csrf_header("POST", false, "csrftoken=tok"), None);
        // no token cookie
        assert_eq!(csrf_header("POST", true, "theme=dark"), None);
    }
}
