//! # Authentication Endpoints
//!
//! Login, registration, profile and password management, plus the
//! third-party OAuth logins.

use shared::{
    AuthResponse, ChangePasswordRequest, EmailLoginRequest, EmailRequest, LoginRequest, MessageResponse,
    OAuthCodeRequest, RefreshTokenRequest, RegisterRequest, ResetPasswordRequest, StudentRegisterRequest,
    TokenRequest, TokenResponse, User, UserUpdate,
};

use super::client::ApiClient;
use crate::core::error::Result;
use crate::services::http::ApiRequest;

/// Third-party login providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Wechat,
    Qq,
    Weibo,
}

impl OAuthProvider {
    fn path(self) -> &'static str {
        match self {
            OAuthProvider::Wechat => "/auth/wechat-login",
            OAuthProvider::Qq => "/auth/qq-login",
            OAuthProvider::Weibo => "/auth/weibo-login",
        }
    }
}

impl ApiClient {
    /// Email + password login against the legacy `/user` routes.
    ///
    /// The backend takes the address in an `email` field even though the
    /// login form calls it a username.
    #[tracing::instrument(skip(self, password))]
    pub async fn login_with_email(&self, username: &str, password: &str) -> Result<AuthResponse> {
        let body = EmailLoginRequest {
            email: username.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self.http.execute(ApiRequest::post("/user/login").json(&body)?).await?;
        tracing::info!(user_id = %response.user.id, "Email login successful");
        Ok(response)
    }

    /// Student registration; a missing student id defaults to the email local part.
    pub async fn register_student(&self, data: StudentRegisterRequest) -> Result<MessageResponse> {
        let body = data.with_default_student_id();
        self.http.execute(ApiRequest::post("/user/register").json(&body)?).await
    }

    #[tracing::instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse> {
        tracing::info!("Attempting login");
        let start = std::time::Instant::now();
        let response: AuthResponse = self.http.execute(ApiRequest::post("/auth/login").json(credentials)?).await?;
        tracing::info!(duration_ms = start.elapsed().as_millis() as u64, "Login successful");
        Ok(response)
    }

    #[tracing::instrument(skip(self, data), fields(username = %data.username))]
    pub async fn register(&self, data: &RegisterRequest) -> Result<MessageResponse> {
        self.http.execute(ApiRequest::post("/auth/register").json(data)?).await
    }

    pub async fn logout(&self) -> Result<MessageResponse> {
        self.http.execute(ApiRequest::post("/auth/logout")).await
    }

    pub async fn get_current_user(&self) -> Result<User> {
        self.http.execute(ApiRequest::get("/users/me")).await
    }

    pub async fn update_user_info(&self, update: &UserUpdate) -> Result<User> {
        self.http.execute(ApiRequest::put("/users/me").json(update)?).await
    }

    pub async fn change_password(&self, data: &ChangePasswordRequest) -> Result<MessageResponse> {
        self.http.execute(ApiRequest::put("/users/me/password").json(data)?).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
        let body = EmailRequest { email: email.to_string() };
        self.http.execute(ApiRequest::post("/auth/forgot-password").json(&body)?).await
    }

    pub async fn reset_password(&self, data: &ResetPasswordRequest) -> Result<MessageResponse> {
        self.http.execute(ApiRequest::post("/auth/reset-password").json(data)?).await
    }

    pub async fn send_verification_code(&self, email: &str) -> Result<MessageResponse> {
        let body = EmailRequest { email: email.to_string() };
        self.http
            .execute(ApiRequest::post("/auth/send-verification-code").json(&body)?)
            .await
    }

    pub async fn verify_email(&self, token: &str) -> Result<MessageResponse> {
        let body = TokenRequest { token: token.to_string() };
        self.http.execute(ApiRequest::post("/auth/verify-email").json(&body)?).await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        let body = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.http.execute(ApiRequest::post("/auth/refresh-token").json(&body)?).await
    }

    /// Exchange a provider authorization code for a session.
    #[tracing::instrument(skip(self, code))]
    pub async fn oauth_login(&self, provider: OAuthProvider, code: &str) -> Result<AuthResponse> {
        let body = OAuthCodeRequest { code: code.to_string() };
        self.http.execute(ApiRequest::post(provider.path()).json(&body)?).await
    }

    pub async fn wechat_login(&self, code: &str) -> Result<AuthResponse> {
        self.oauth_login(OAuthProvider::Wechat, code).await
    }

    pub async fn qq_login(&self, code: &str) -> Result<AuthResponse> {
        self.oauth_login(OAuthProvider::Qq, code).await
    }

    pub async fn weibo_login(&self, code: &str) -> Result<AuthResponse> {
        self.oauth_login(OAuthProvider::Weibo, code).await
    }
}
