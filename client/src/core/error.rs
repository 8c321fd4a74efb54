//! # Common Error Types
//!
//! Consolidated error handling for the marketplace client.
//!
//! Every fallible operation in this crate returns [`ClientError`]. The
//! variants follow where the failure happened:
//!
//! - **Http**: the server answered with a non-2xx status
//! - **Network**: the request went out but no response came back
//! - **Request**: the request could not be built (bad URL, bad body)
//! - **Decode**: the response body did not match the expected shape
//! - **Cancelled**: the caller aborted the request
//! - **Storage**: the persisted session could not be read or written
//! - **Validation**: local input checks failed before any request was sent
//! - **Config**: environment configuration is missing or invalid
//!
//! ## User-facing messages
//!
//! [`ClientError::user_message`] turns any error into the text shown in a
//! toast: the server's own `message` when it sent one, otherwise a default
//! per status code.
//!
//! ```rust
//! use market_client::core::error::ClientError;
//!
//! let err = ClientError::Http { status: 404, message: None, body: None };
//! assert_eq!(err.user_message(), "请求的资源不存在");
//!
//! let err = ClientError::Http { status: 409, message: Some("用户名已存在".into()), body: None };
//! assert_eq!(err.user_message(), "用户名已存在");
//! ```

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx response.
    ///
    /// `message` is the backend's `message` (or legacy `error`) field, `body`
    /// the raw JSON when it parsed.
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("no message"))]
    Http {
        status: u16,
        message: Option<String>,
        body: Option<serde_json::Value>,
    },

    /// Connection refused, DNS failure, timeout, or the body stream broke.
    #[error("Network error: {0}")]
    Network(String),

    /// The request could not be built.
    #[error("Request error: {0}")]
    Request(String),

    /// The response body was not the JSON we expected.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Request cancelled")]
    Cancelled,

    /// Reading or writing the persisted session failed.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Convenience type alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend's own error message, when it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Http { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Text to show the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http { status, .. } => match self.server_message() {
                Some(message) => message.to_string(),
                None => default_status_message(*status),
            },
            ClientError::Network(_) => "网络错误，请检查网络连接".to_string(),
            ClientError::Cancelled => "请求已取消".to_string(),
            ClientError::Request(msg)
            | ClientError::Decode(msg)
            | ClientError::Storage(msg)
            | ClientError::Validation(msg)
            | ClientError::Config(msg) => {
                if msg.is_empty() {
                    "请求错误".to_string()
                } else {
                    msg.clone()
                }
            }
        }
    }
}

fn default_status_message(status: u16) -> String {
    let text = match status {
        400 => "请求参数错误",
        401 => "未授权，请登录",
        403 => "拒绝访问",
        404 => "请求的资源不存在",
        405 => "请求方法不允许",
        406 => "请求的格式不支持",
        408 => "请求超时",
        409 => "请求冲突",
        429 => "请求过于频繁",
        500 => "服务器内部错误",
        502 => "网关错误",
        503 => "服务不可用",
        504 => "网关超时",
        other => return format!("请求失败 ({})", other),
    };
    text.to_string()
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ClientError::Request(err.to_string())
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<lib_utils::envs::Error> for ClientError {
    fn from(err: lib_utils::envs::Error) -> Self {
        match err {
            lib_utils::envs::Error::MissingEnv(name) => {
                ClientError::Config(format!("{} must be set in environment", name))
            }
            lib_utils::envs::Error::WrongFormat(name) => {
                ClientError::Config(format!("{} has an invalid value", name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, message: Option<&str>) -> ClientError {
        ClientError::Http {
            status,
            message: message.map(str::to_string),
            body: None,
        }
    }

    #[test]
    fn test_server_message_wins() {
        assert_eq!(http(400, Some("标题不能为空")).user_message(), "标题不能为空");
        assert_eq!(http(400, Some("")).user_message(), "请求参数错误");
    }

    #[test]
    fn test_status_defaults() {
        assert_eq!(http(401, None).user_message(), "未授权，请登录");
        assert_eq!(http(429, None).user_message(), "请求过于频繁");
        assert_eq!(http(504, None).user_message(), "网关超时");
        assert_eq!(http(418, None).user_message(), "请求失败 (418)");
    }

    #[test]
    fn test_non_http_errors() {
        assert_eq!(
            ClientError::Network("connection refused".into()).user_message(),
            "网络错误，请检查网络连接"
        );
        assert_eq!(ClientError::Request(String::new()).user_message(), "请求错误");
        assert_eq!(ClientError::Validation("bad".into()).user_message(), "bad");
    }

    #[test]
    fn test_status_helpers() {
        assert!(http(401, None).is_unauthorized());
        assert_eq!(http(503, None).status(), Some(503));
        assert_eq!(ClientError::Cancelled.status(), None);
        assert_eq!(http(500, None).to_string(), "HTTP 500: no message");
    }
}
