//! # Utilities Library
//!
//! Formatting, string, collection, time and validation helpers shared by the
//! marketplace client. Everything here is synchronous and free of I/O.

pub mod collections;
pub mod envs;
pub mod format;
pub mod labels;
pub mod text;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use collections::{merge_objects, unique_array};
pub use envs::{get_env, get_env_or, get_env_parse, get_env_parse_or};
pub use format::{format_description, format_file_size, format_number, format_price};
pub use text::{generate_id, get_url_params, truncate_text};
pub use time::{days_between, format_date, format_time, format_year, now_utc, parse_utc};
pub use validation::{
    check_password_strength, is_valid_email, is_valid_phone, validate_email, validate_min_length,
    validate_not_empty, PasswordStrength,
};
