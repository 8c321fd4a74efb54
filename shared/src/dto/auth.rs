use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{id_from_string_or_number, parse_timestamp, string_or_null};

/// Account role
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// User profile as returned by `/users/me` and the login endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub username: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub nickname: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub avatar: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub phone: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, deserialize_with = "string_or_null")]
    pub created_at: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub updated_at: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Registration time, if the backend sent a readable one.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

/// Username/password login (`POST /auth/login`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Legacy login (`POST /user/login`). The backend keys accounts by email,
/// so the login form's username is sent in the `email` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailLoginRequest {
    pub email: String,
    pub password: String,
}

/// Full registration form (`POST /auth/register`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub nickname: String,
    pub email: String,
    pub phone: String,
}

/// Student registration (`POST /user/register`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentRegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

impl StudentRegisterRequest {
    /// Fill a missing (or blank) `student_id` with the local part of the email.
    pub fn with_default_student_id(mut self) -> Self {
        let missing = self
            .student_id
            .as_deref()
            .map(|id| id.trim().is_empty())
            .unwrap_or(true);
        if missing {
            let local = self.email.split('@').next().unwrap_or_default();
            self.student_id = Some(local.to_string());
        }
        self
    }
}

/// Successful login payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Partial profile update (`PUT /users/me`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none() && self.avatar.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

/// `PUT /users/me/password`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// `POST /auth/reset-password`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Body carrying only an email (forgot password, verification code)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailRequest {
    pub email: String,
}

/// Body carrying only a token (email verification)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenRequest {
    pub token: String,
}

/// `POST /auth/refresh-token`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Fresh token pair from `POST /auth/refresh-token`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    #[serde(default, alias = "refresh_token", skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Third-party login authorization code (WeChat, QQ, Weibo)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuthCodeRequest {
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_accepts_numeric_id_and_null_fields() {
        let user: User = serde_json::from_str(
            r#"{"id":42,"username":"bob","nickname":null,"avatar":null,"role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "42");
        assert_eq!(user.nickname, "");
        assert!(user.is_admin());
    }

    #[test]
    fn test_user_role_defaults_to_user() {
        let user: User = serde_json::from_str(r#"{"id":"7","username":"eve"}"#).unwrap();
        assert_eq!(user.role, Role::User);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_student_register_defaults_student_id() {
        let req = StudentRegisterRequest {
            username: "alice".into(),
            password: "pw".into(),
            email: "2021001@campus.edu".into(),
            student_id: None,
        }
        .with_default_student_id();
        assert_eq!(req.student_id.as_deref(), Some("2021001"));

        let kept = StudentRegisterRequest {
            username: "alice".into(),
            password: "pw".into(),
            email: "2021001@campus.edu".into(),
            student_id: Some("S-9".into()),
        }
        .with_default_student_id();
        assert_eq!(kept.student_id.as_deref(), Some("S-9"));
    }

    #[test]
    fn test_password_bodies_are_camel_case() {
        let body = ChangePasswordRequest {
            current_password: "a".into(),
            new_password: "b".into(),
            confirm_password: "b".into(),
        };
        let value = serde_json::to_value(body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"currentPassword": "a", "newPassword": "b", "confirmPassword": "b"})
        );

        let refresh = serde_json::to_value(RefreshTokenRequest { refresh_token: "r".into() }).unwrap();
        assert_eq!(refresh, serde_json::json!({"refreshToken": "r"}));
    }

    #[test]
    fn test_user_update_skips_unset_fields() {
        let update = UserUpdate {
            nickname: Some("Neo".into()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert_eq!(serde_json::to_value(update).unwrap(), serde_json::json!({"nickname": "Neo"}));
        assert!(UserUpdate::default().is_empty());
    }

    #[test]
    fn test_token_response_accepts_both_casings() {
        let camel: TokenResponse = serde_json::from_str(r#"{"token":"t","refreshToken":"r"}"#).unwrap();
        let snake: TokenResponse = serde_json::from_str(r#"{"token":"t","refresh_token":"r"}"#).unwrap();
        assert_eq!(camel, snake);
        let bare: TokenResponse = serde_json::from_str(r#"{"token":"t"}"#).unwrap();
        assert!(bare.refresh_token.is_none());
    }
}
