//! # API Client
//!
//! Entry point for the backend REST API. Endpoint methods live in the
//! sibling modules as `impl ApiClient` blocks.

use shared::{
    AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, RegisterRequest, ResetPasswordRequest, User,
    UserUpdate,
};

use crate::config::ClientConfig;
use crate::core::error::Result;
use crate::core::service::MarketApi;
use crate::services::http::{HttpClient, TokenSlot};

/// Client for the marketplace REST API.
///
/// Every call goes through the shared [`HttpClient`], so it picks up the
/// session token, logging and retry policy from there.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) http: HttpClient,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, token: TokenSlot) -> Result<Self> {
        Ok(Self {
            http: HttpClient::from_config(config, token)?,
        })
    }

    pub fn from_http(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}

// Implement MarketApi trait for ApiClient
#[async_trait::async_trait]
impl MarketApi for ApiClient {
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse> {
        ApiClient::login(self, credentials).await
    }

    async fn register(&self, data: &RegisterRequest) -> Result<MessageResponse> {
        ApiClient::register(self, data).await
    }

    async fn logout(&self) -> Result<MessageResponse> {
        ApiClient::logout(self).await
    }

    async fn get_current_user(&self) -> Result<User> {
        ApiClient::get_current_user(self).await
    }

    async fn update_user_info(&self, update: &UserUpdate) -> Result<User> {
        ApiClient::update_user_info(self, update).await
    }

    async fn change_password(&self, data: &ChangePasswordRequest) -> Result<MessageResponse> {
        ApiClient::change_password(self, data).await
    }

    async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
        ApiClient::forgot_password(self, email).await
    }

    async fn reset_password(&self, data: &ResetPasswordRequest) -> Result<MessageResponse> {
        ApiClient::reset_password(self, data).await
    }
}

/// Percent-encode one path segment.
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("42"), "42");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }
}
