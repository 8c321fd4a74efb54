//! Human-readable request/response/error log lines.
//!
//! These mirror what the HTTP client writes at debug level, and are public so
//! callers can log their own requests in the same shape.

use chrono::{SecondsFormat, Utc};
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::Method;
use serde_json::{Map, Value};

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn method_label(method: Option<&Method>) -> String {
    method.map(|m| m.as_str().to_uppercase()).unwrap_or_else(|| "GET".to_string())
}

fn json_or_empty(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(value) => value.to_string(),
    }
}

/// Headers as a JSON object. Credentials are masked.
pub fn headers_json(headers: &HeaderMap) -> Value {
    let mut map = Map::new();
    for (name, value) in headers {
        let rendered = if name == AUTHORIZATION {
            "Bearer ***".to_string()
        } else {
            value.to_str().unwrap_or("<binary>").to_string()
        };
        map.insert(name.as_str().to_string(), Value::String(rendered));
    }
    Value::Object(map)
}

/// `[ts] METHOD url\nHeaders: {...}\nData: {...}`
pub fn format_request_log(method: Option<&Method>, url: &str, headers: &HeaderMap, body: Option<&Value>) -> String {
    let headers = if headers.is_empty() {
        String::new()
    } else {
        headers_json(headers).to_string()
    };
    format!(
        "[{}] {} {}\nHeaders: {}\nData: {}",
        timestamp(),
        method_label(method),
        url,
        headers,
        json_or_empty(body)
    )
}

/// `[ts] METHOD url STATUS\nData: {...}`
pub fn format_response_log(method: Option<&Method>, url: &str, status: u16, body: Option<&Value>) -> String {
    format!(
        "[{}] {} {} {}\nData: {}",
        timestamp(),
        method_label(method),
        url,
        status,
        json_or_empty(body)
    )
}

/// `[ts] METHOD url STATUS|N/A\nError: msg\nResponse Data: {...}`
pub fn format_error_log(
    method: Option<&Method>,
    url: &str,
    status: Option<u16>,
    message: &str,
    body: Option<&Value>,
) -> String {
    let status = status.map(|s| s.to_string()).unwrap_or_else(|| "N/A".to_string());
    let message = if message.is_empty() { "Unknown error" } else { message };
    format!(
        "[{}] {} {} {}\nError: {}\nResponse Data: {}",
        timestamp(),
        method_label(method),
        url,
        status,
        message,
        json_or_empty(body)
    )
}

/// 2xx check on a raw status code.
pub fn is_response_successful(status: u16) -> bool {
    (200..300).contains(&status)
}

pub fn has_response_error(status: u16) -> bool {
    !is_response_successful(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, CONTENT_TYPE};
    use serde_json::json;

    /// Drop the `[timestamp] ` prefix so lines compare deterministically.
    fn strip_ts(line: &str) -> &str {
        line.split_once("] ").map(|(_, rest)| rest).unwrap()
    }

    #[test]
    fn test_request_log_masks_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret-token"));

        let line = format_request_log(Some(&Method::POST), "/auth/login", &headers, Some(&json!({"username": "a"})));
        assert!(line.starts_with('['));
        let rest = strip_ts(&line);
        assert!(rest.starts_with("POST /auth/login\nHeaders: {"));
        assert!(rest.contains("\"authorization\":\"Bearer ***\""));
        assert!(!rest.contains("secret-token"));
        assert!(rest.ends_with("Data: {\"username\":\"a\"}"));
    }

    #[test]
    fn test_request_log_defaults_to_get() {
        let line = format_request_log(None, "/requests", &HeaderMap::new(), None);
        assert_eq!(strip_ts(&line), "GET /requests\nHeaders: \nData: ");
    }

    #[test]
    fn test_response_and_error_logs() {
        let line = format_response_log(Some(&Method::GET), "/users/me", 200, Some(&json!({"id": 1})));
        assert_eq!(strip_ts(&line), "GET /users/me 200\nData: {\"id\":1}");

        let line = format_error_log(Some(&Method::DELETE), "/requests/3", None, "", None);
        assert_eq!(strip_ts(&line), "DELETE /requests/3 N/A\nError: Unknown error\nResponse Data: ");

        let line = format_error_log(Some(&Method::PUT), "/requests/3", Some(403), "HTTP 403", Some(&json!({"message": "no"})));
        assert!(strip_ts(&line).starts_with("PUT /requests/3 403\nError: HTTP 403"));
    }

    #[test]
    fn test_status_predicates() {
        assert!(is_response_successful(200));
        assert!(is_response_successful(204));
        assert!(!is_response_successful(301));
        assert!(has_response_error(500));
        assert!(has_response_error(199));
    }
}
