//! Form validation run before anything is sent to the backend.

use lib_utils::{is_valid_email, is_valid_phone};
use shared::{ChangePasswordRequest, LoginRequest, NewRequestItem, RegisterRequest};

use crate::core::error::ClientError;

pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }

    /// Chain another check; the first failure wins.
    pub fn and(self, next: impl FnOnce() -> ValidationResult) -> ValidationResult {
        if self.is_valid {
            next()
        } else {
            self
        }
    }

    pub fn into_result(self) -> Result<(), ClientError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(ClientError::Validation(self.error.unwrap_or_default()))
        }
    }
}

/// 3-20 characters: letters, digits, `_` and `-`.
pub fn validate_username(username: &str) -> ValidationResult {
    let length = username.chars().count();
    if username.trim().is_empty() {
        return ValidationResult::err("请输入用户名");
    }

    if !(3..=20).contains(&length) {
        return ValidationResult::err("用户名长度应为 3 到 20 个字符");
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return ValidationResult::err("用户名只能包含字母、数字、下划线和短横线");
    }

    ValidationResult::ok()
}

pub fn validate_email(email: &str) -> ValidationResult {
    if email.is_empty() {
        return ValidationResult::err("请输入邮箱地址");
    }

    if !is_valid_email(email) {
        return ValidationResult::err("请输入正确的邮箱地址");
    }

    ValidationResult::ok()
}

pub fn validate_phone(phone: &str) -> ValidationResult {
    if phone.is_empty() {
        return ValidationResult::err("请输入手机号");
    }

    if !is_valid_phone(phone) {
        return ValidationResult::err("请输入正确的手机号");
    }

    ValidationResult::ok()
}

/// 6-20 characters.
pub fn validate_password(password: &str) -> ValidationResult {
    if password.is_empty() {
        return ValidationResult::err("请输入密码");
    }

    if !(6..=20).contains(&password.chars().count()) {
        return ValidationResult::err("密码长度应为 6 到 20 个字符");
    }

    ValidationResult::ok()
}

pub fn validate_password_confirmation(password: &str, confirmation: &str) -> ValidationResult {
    if confirmation.is_empty() {
        return ValidationResult::err("请再次输入密码");
    }

    if password != confirmation {
        return ValidationResult::err("两次输入的密码不一致");
    }

    ValidationResult::ok()
}

/// Both login fields must be filled in; their format is the server's call.
pub fn validate_login(credentials: &LoginRequest) -> ValidationResult {
    if credentials.username.trim().is_empty() || credentials.password.is_empty() {
        return ValidationResult::err("请输入用户名和密码");
    }

    ValidationResult::ok()
}

pub fn validate_registration(data: &RegisterRequest) -> ValidationResult {
    validate_username(&data.username)
        .and(|| validate_password(&data.password))
        .and(|| validate_email(&data.email))
        .and(|| validate_phone(&data.phone))
}

pub fn validate_change_password(data: &ChangePasswordRequest) -> ValidationResult {
    if data.current_password.is_empty() {
        return ValidationResult::err("请输入当前密码");
    }

    validate_password(&data.new_password).and(|| validate_password_confirmation(&data.new_password, &data.confirm_password))
}

pub fn validate_new_request(data: &NewRequestItem) -> ValidationResult {
    if data.title.trim().is_empty() {
        return ValidationResult::err("请输入标题");
    }

    if data.title.chars().count() > 50 {
        return ValidationResult::err("标题不能超过 50 个字符");
    }

    if data.description.trim().is_empty() {
        return ValidationResult::err("请输入描述");
    }

    if data.category_id.trim().is_empty() {
        return ValidationResult::err("请选择分类");
    }

    if let Some(range) = data.price_range {
        if range.min < 0.0 || range.max < range.min {
            return ValidationResult::err("价格区间不正确");
        }
    }

    ValidationResult::ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::PriceRange;

    #[test]
    fn test_username_validation() {
        assert!(validate_username("alice").is_valid);
        assert!(validate_username("user_123").is_valid);
        assert!(validate_username("张三丰").is_valid);
        assert!(!validate_username("").is_valid);
        assert!(!validate_username("ab").is_valid);
        assert!(!validate_username("a".repeat(21).as_str()).is_valid);
        assert!(!validate_username("bad name").is_valid);
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("secret1").is_valid);
        assert_eq!(validate_password("12345").error.as_deref(), Some("密码长度应为 6 到 20 个字符"));
        assert!(validate_password_confirmation("abc123", "abc123").is_valid);
        assert_eq!(
            validate_password_confirmation("abc123", "abc124").error.as_deref(),
            Some("两次输入的密码不一致")
        );
    }

    #[test]
    fn test_login_requires_both_fields() {
        let credentials = |username: &str, password: &str| LoginRequest {
            username: username.into(),
            password: password.into(),
        };
        assert!(validate_login(&credentials("alice", "x")).is_valid);
        assert_eq!(
            validate_login(&credentials(" ", "x")).error.as_deref(),
            Some("请输入用户名和密码")
        );
        assert!(matches!(
            validate_login(&credentials("alice", "")).into_result(),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn test_registration_reports_first_failure() {
        let mut data = RegisterRequest {
            username: "alice".into(),
            password: "secret1".into(),
            nickname: "A".into(),
            email: "alice@campus.edu".into(),
            phone: "13800138000".into(),
        };
        assert!(validate_registration(&data).into_result().is_ok());

        data.email = "nope".into();
        data.phone = "123".into();
        let err = validate_registration(&data).into_result().unwrap_err();
        assert_eq!(err.user_message(), "请输入正确的邮箱地址");
    }

    #[test]
    fn test_change_password() {
        let data = ChangePasswordRequest {
            current_password: "old-pass".into(),
            new_password: "new-pass".into(),
            confirm_password: "new-pass".into(),
        };
        assert!(validate_change_password(&data).is_valid);

        let data = ChangePasswordRequest {
            current_password: String::new(),
            ..data
        };
        assert_eq!(validate_change_password(&data).error.as_deref(), Some("请输入当前密码"));
    }

    #[test]
    fn test_new_request_validation() {
        let mut data = NewRequestItem {
            title: "求购二手自行车".into(),
            description: "九成新即可".into(),
            price_range: Some(PriceRange { min: 100.0, max: 300.0 }),
            category_id: "5".into(),
            tags: None,
            images: None,
            location: None,
            status: None,
        };
        assert!(validate_new_request(&data).is_valid);

        data.price_range = Some(PriceRange { min: 300.0, max: 100.0 });
        assert!(!validate_new_request(&data).is_valid);

        data.price_range = None;
        data.category_id = " ".into();
        assert_eq!(validate_new_request(&data).error.as_deref(), Some("请选择分类"));
    }
}
