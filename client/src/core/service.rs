//! # Service Traits
//!
//! Traits for dependency injection, so the session store can run against a
//! mock backend in tests.

use async_trait::async_trait;
use shared::{
    AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, RegisterRequest, ResetPasswordRequest, User,
    UserUpdate,
};

use crate::core::error::Result;

/// The account operations the session store depends on.
#[async_trait]
pub trait MarketApi: Send + Sync {
    /// Login with username and password
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse>;

    /// Register a new account
    async fn register(&self, data: &RegisterRequest) -> Result<MessageResponse>;

    /// Invalidate the current token server side
    async fn logout(&self) -> Result<MessageResponse>;

    /// Profile of the token's owner
    async fn get_current_user(&self) -> Result<User>;

    async fn update_user_info(&self, update: &UserUpdate) -> Result<User>;

    async fn change_password(&self, data: &ChangePasswordRequest) -> Result<MessageResponse>;

    async fn forgot_password(&self, email: &str) -> Result<MessageResponse>;

    async fn reset_password(&self, data: &ResetPasswordRequest) -> Result<MessageResponse>;
}
